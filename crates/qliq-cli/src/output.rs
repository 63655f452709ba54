//! Output formatting utilities

use colored::*;
use qliq::RenderedRow;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a dimmed placeholder for empty listings
pub fn print_empty(message: &str) {
    println!("{}", message.dimmed());
}

/// Width of the identifier column in listings.
const ID_WIDTH: usize = 26;

/// Identifier column, padded before colouring so escape codes do not eat
/// into the width.
pub fn id_cell(id: &str) -> ColoredString {
    format!("{:<width$}", id, width = ID_WIDTH).dimmed()
}

/// Format a price the way the shop shows it
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Colour one downline row with its level palette
pub fn paint_row(row: &RenderedRow) -> String {
    let text = row.to_string();
    match (row.colors.foreground_rgb(), row.colors.background_rgb()) {
        (Some((fr, fg, fb)), Some((br, bg, bb))) => text
            .lines()
            .map(|line| {
                let trimmed = line.trim_start();
                let pad = &line[..line.len() - trimmed.len()];
                format!(
                    "{}{}",
                    pad,
                    trimmed.truecolor(fr, fg, fb).on_truecolor(br, bg, bb)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => text,
    }
}
