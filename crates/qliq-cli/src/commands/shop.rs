//! Catalog, cart and order commands

use clap::Subcommand;
use colored::*;
use qliq::{ApiClient, CartState, Product};

use crate::output::{self, OutputFormat};

/// Cart subcommands
#[derive(Subcommand)]
pub enum CartCommands {
    /// Show the cart contents
    Show,

    /// Add one unit of a product
    Add {
        /// Product identifier
        product_id: String,
    },

    /// Remove a cart line
    Remove {
        /// Cart line identifier, as shown by `qliq cart show`
        cart_item_id: String,
    },
}

/// List the catalog
pub async fn products(client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    let products = client.list_products().await?;
    print_products(&products, format, "No products available")
}

/// List suggested products
pub async fn recommendations(client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    let products = client.get_recommendations().await?;
    print_products(&products, format, "No recommendations yet")
}

/// Run a cart subcommand. Mutations print the cart as it is afterwards.
pub async fn cart(
    command: CartCommands,
    client: &ApiClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let cart = match command {
        CartCommands::Show => client.get_cart().await?,
        CartCommands::Add { product_id } => {
            client.add_to_cart(&product_id).await?;
            client.get_cart().await?
        }
        CartCommands::Remove { cart_item_id } => {
            client.remove_from_cart(&cart_item_id).await?;
            client.get_cart().await?
        }
    };
    print_cart(&cart, format)
}

/// Place the order
pub async fn checkout(client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    let confirmation = client.checkout().await?;

    match format {
        OutputFormat::Json => output::print_json(&confirmation)?,
        OutputFormat::Text => {
            output::print_success("Order placed");
            for (key, value) in &confirmation.details {
                println!("  {}: {}", key, value);
            }
        }
    }
    Ok(())
}

/// List past orders
pub async fn orders(client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    let orders = client.get_orders().await?;

    if format == OutputFormat::Json {
        return output::print_json(&orders);
    }
    if orders.is_empty() {
        output::print_empty("No orders yet");
        return Ok(());
    }

    for order in &orders {
        let reference = order.transaction_id.as_deref().unwrap_or(&order.id);
        let status = order.payment_status.as_deref().unwrap_or("unknown");
        let status = if status == "paid" {
            status.green()
        } else {
            status.yellow()
        };
        println!(
            "{}  {}  {}",
            reference.bold(),
            order.created_at.as_deref().unwrap_or("-"),
            status
        );
        for item in &order.items {
            let name = item.product.as_ref().map_or("(unknown product)", |p| p.name.as_str());
            println!("    {} x{}", name, item.quantity);
        }
        if let Some(total) = order.total {
            println!("    Total: {}", output::money(total));
        }
    }
    Ok(())
}

fn print_products(products: &[Product], format: OutputFormat, empty: &str) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return output::print_json(products);
    }
    if products.is_empty() {
        output::print_empty(empty);
        return Ok(());
    }

    for product in products {
        println!(
            "{} {:<32} {:>10}",
            output::id_cell(&product.id),
            product.name,
            output::money(product.price)
        );
    }
    Ok(())
}

fn print_cart(cart: &CartState, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return output::print_json(cart);
    }
    if cart.is_empty() {
        output::print_empty("Cart is empty");
        return Ok(());
    }

    for line in &cart.items {
        let name = line.product.as_ref().map_or("(unknown product)", |p| p.name.as_str());
        println!(
            "{} {:<32} x{:<3} {:>10}",
            output::id_cell(&line.id),
            name,
            line.quantity,
            output::money(line.line_total())
        );
    }
    println!(
        "{} item(s), total {}",
        cart.unit_count(),
        output::money(cart.total()).bold()
    );
    Ok(())
}
