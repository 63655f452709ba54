//! Plain-text rendering of rows

use std::fmt;

use super::RenderedRow;

/// Spaces per level in text output.
const TEXT_INDENT: usize = 2;

impl fmt::Display for RenderedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = " ".repeat(self.depth as usize * TEXT_INDENT);
        write!(f, "{}{}", pad, self.display_name)?;
        for detail in [&self.level_label, &self.email, &self.commission]
            .into_iter()
            .flatten()
        {
            write!(f, "\n{}  {}", pad, detail)?;
        }
        Ok(())
    }
}

/// A rendered tree, one row per node, separated by newlines.
pub struct TreeView<'a>(pub &'a [RenderedRow]);

impl fmt::Display for TreeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}
