//! Referral downline view

use qliq::{render_with, ApiClient, TreeContext};

use crate::output::{self, OutputFormat};

/// Fetch, normalize and print the caller's downline
pub async fn show(
    client: &ApiClient,
    ctx: &TreeContext,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tree = client.downline(ctx).await?;
    let rows = render_with(&tree, ctx)?;

    match format {
        OutputFormat::Json => output::print_json(&rows)?,
        OutputFormat::Text => {
            for row in &rows {
                println!("{}", output::paint_row(row));
            }
            println!(
                "\n{} member(s), {} level(s)",
                tree.node_count(),
                tree.height()
            );
        }
    }
    Ok(())
}
