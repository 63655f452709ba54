//! QLIQ CLI - terminal front-end for the QLIQ MLM shop
//!
//! Wires configuration, logging, the credential store and the API client
//! together, then runs one command:
//! - Sign in, sign out, register, show the profile
//! - Browse products and recommendations
//! - Manage the cart, check out, list orders
//! - Show the referral downline

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{account, downline, shop};
use output::OutputFormat;
use qliq::{ApiClient, ClientConfig, FileCredentialStore, Session};

/// QLIQ CLI application
#[derive(Parser)]
#[command(name = "qliq")]
#[command(about = "QLIQ MLM shop from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QLIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Backend API root, e.g. http://localhost:8000/api
    #[arg(short, long, env = "QLIQ_BACKEND_URL")]
    endpoint: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "QLIQ_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Create an account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "QLIQ_PASSWORD", hide_env_values = true)]
        password: String,

        /// Referral code of the member who invited you
        #[arg(long)]
        referral_code: Option<String>,
    },

    /// Show your profile and referral code
    Profile,

    /// List the product catalog
    Products,

    /// List suggested products
    Recommendations,

    /// Manage the cart
    Cart {
        #[command(subcommand)]
        command: shop::CartCommands,
    },

    /// Place an order for the cart contents
    Checkout,

    /// List past orders
    Orders,

    /// Show your referral downline
    Downline,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // Load config; the endpoint flag wins over file and environment
    let config = ClientConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_base_url_override(cli.endpoint.clone());
    config.validate()?;
    tracing::debug!(endpoint = %config.base_url, "configuration loaded");

    let store = match &config.credentials_path {
        Some(path) => FileCredentialStore::new(path),
        None => FileCredentialStore::open_default()?,
    };
    let session = Session::new(Arc::new(store));
    let client = ApiClient::new(&config, session).context("failed to create API client")?;

    match cli.command {
        Commands::Login { email, password } => account::login(&client, &email, &password).await,
        Commands::Logout => account::logout(&client),
        Commands::Register {
            name,
            email,
            password,
            referral_code,
        } => {
            account::register(&client, name, email, password, referral_code, cli.output).await
        }
        Commands::Profile => account::profile(&client, cli.output).await,
        Commands::Products => shop::products(&client, cli.output).await,
        Commands::Recommendations => shop::recommendations(&client, cli.output).await,
        Commands::Cart { command } => shop::cart(command, &client, cli.output).await,
        Commands::Checkout => shop::checkout(&client, cli.output).await,
        Commands::Orders => shop::orders(&client, cli.output).await,
        Commands::Downline => downline::show(&client, &config.tree_context(), cli.output).await,
        Commands::Config => {
            println!("Endpoint: {}", config.base_url);
            println!("Timeout: {}s", config.timeout_seconds);
            println!("Max tree depth: {}", config.max_tree_depth);
            match &config.credentials_path {
                Some(path) => println!("Credentials: {}", path.display()),
                None => println!("Credentials: {}", FileCredentialStore::default_path()?.display()),
            }
            Ok(())
        }
    }
}
