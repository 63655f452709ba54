//! Account commands

use colored::*;
use qliq::{ApiClient, RegisterRequest};

use crate::output::{self, OutputFormat};

/// Sign in and keep the token for later commands
pub async fn login(client: &ApiClient, email: &str, password: &str) -> anyhow::Result<()> {
    client.login(email, password).await?;
    output::print_success(&format!("Signed in as {}", email));
    Ok(())
}

/// Drop the stored token
pub fn logout(client: &ApiClient) -> anyhow::Result<()> {
    client.logout()?;
    output::print_success("Signed out");
    Ok(())
}

/// Create an account, optionally under a recruiting member
pub async fn register(
    client: &ApiClient,
    name: String,
    email: String,
    password: String,
    referral_code: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let request = RegisterRequest::new(name, email, password)
        .with_referral_code(referral_code.as_deref());
    let response = client.register(&request).await?;

    match format {
        OutputFormat::Json => output::print_json(&response)?,
        OutputFormat::Text => {
            output::print_success(&format!("Registered {}", request.email));
            println!("Run `qliq login` to sign in.");
        }
    }
    Ok(())
}

/// Show the signed-in user
pub async fn profile(client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    let profile = client.get_user_profile().await?;

    match format {
        OutputFormat::Json => output::print_json(&profile)?,
        OutputFormat::Text => {
            println!("{}", profile.name.bold());
            println!("  Email:         {}", profile.email);
            println!(
                "  Referral code: {}",
                profile.referral_code.as_deref().unwrap_or("-").cyan()
            );
            println!(
                "  Commission:    {}",
                output::money(profile.commission_balance).green()
            );
        }
    }
    Ok(())
}
