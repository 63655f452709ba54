//! Flattening a referral tree into display rows
//!
//! Rendering is a pure pre-order walk: the root first, then each child's
//! whole subtree in server order. Each node becomes one [`RenderedRow`]
//! carrying its indentation, level colours and the labels that survive the
//! suppression rules:
//!
//! - the root (depth 0) gets no `Level` label
//! - an absent email is not shown
//! - an absent **or zero** balance is not shown
//!
//! The walk keeps the chain of ancestor ids and fails with
//! [`TreeError::CycleDetected`] when a node repeats one of them, so a
//! malformed payload cannot send it into an endless loop.

mod display;
mod palette;

pub use display::TreeView;
pub use palette::{level_colors, palette_index, LevelColors, INDENT_UNIT, PALETTE};

use indexmap::IndexSet;
use serde::Serialize;

use crate::context::TreeContext;
use crate::error::TreeError;
use crate::tree::ReferralNode;

/// One display line of the downline view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    /// Node identifier, usable as a list key
    pub id: String,

    /// Name shown on the card
    pub display_name: String,

    /// Declared depth of the node
    pub depth: u32,

    /// Left offset: `depth * INDENT_UNIT`
    pub indent: u32,

    /// Slot in [`PALETTE`] the colours came from
    pub palette_index: usize,

    /// Card colours
    pub colors: LevelColors,

    /// `Level N`, absent for the root
    pub level_label: Option<String>,

    /// Email, absent when the node has none
    pub email: Option<String>,

    /// `Commission: $X`, absent when the balance is missing or zero
    pub commission: Option<String>,
}

impl RenderedRow {
    fn from_node(node: &ReferralNode) -> Self {
        Self {
            id: node.id.clone(),
            display_name: node.display_name.clone(),
            depth: node.depth,
            indent: node.depth.saturating_mul(INDENT_UNIT),
            palette_index: palette_index(node.depth),
            colors: level_colors(node.depth),
            level_label: (node.depth != 0).then(|| format!("Level {}", node.depth)),
            email: node.email.clone(),
            commission: node
                .balance
                .filter(|b| *b != 0.0)
                .map(|b| format!("Commission: ${}", b)),
        }
    }
}

/// Render a tree with the default [`TreeContext`].
///
/// # Example
///
/// ```
/// use qliq::{render, ReferralNode};
///
/// let root = ReferralNode::new("u1", "Root", 0)
///     .with_child(ReferralNode::new("u2", "Child", 1).with_balance(10.0));
///
/// let rows = render(&root).unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].indent, 16);
/// assert_eq!(rows[1].commission.as_deref(), Some("Commission: $10"));
/// ```
pub fn render(root: &ReferralNode) -> Result<Vec<RenderedRow>, TreeError> {
    render_with(root, &TreeContext::default())
}

/// Render a tree into pre-order rows.
///
/// # Errors
///
/// Returns `CycleDetected` if a node reuses an ancestor's id and
/// `TreeTooDeep` if the walk descends past `ctx.max_depth`.
pub fn render_with(root: &ReferralNode, ctx: &TreeContext) -> Result<Vec<RenderedRow>, TreeError> {
    let mut rows = Vec::new();
    let mut ancestors = IndexSet::new();
    visit(root, 0, &mut ancestors, &mut rows, ctx)?;
    Ok(rows)
}

fn visit<'a>(
    node: &'a ReferralNode,
    position: usize,
    ancestors: &mut IndexSet<&'a str>,
    rows: &mut Vec<RenderedRow>,
    ctx: &TreeContext,
) -> Result<(), TreeError> {
    ctx.check_depth(position)?;

    if ancestors.contains(node.id.as_str()) {
        let mut chain: Vec<&str> = ancestors.iter().copied().collect();
        chain.push(node.id.as_str());
        tracing::warn!(id = %node.id, "referral tree contains a cycle");
        return Err(TreeError::CycleDetected {
            id: node.id.clone(),
            path: chain.join(" > "),
        });
    }
    ancestors.insert(node.id.as_str());

    rows.push(RenderedRow::from_node(node));
    for child in &node.children {
        visit(child, position + 1, ancestors, rows, ctx)?;
    }

    ancestors.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_has_no_level_label() {
        let rows = render(&ReferralNode::new("r", "Root", 0)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].level_label, None);
        assert_eq!(rows[0].indent, 0);
    }

    #[test]
    fn test_negative_zero_balance_suppressed() {
        let row = RenderedRow::from_node(&ReferralNode::new("r", "R", 1).with_balance(-0.0));
        assert_eq!(row.commission, None);
    }

    #[test]
    fn test_fractional_balance_format() {
        let row = RenderedRow::from_node(&ReferralNode::new("r", "R", 1).with_balance(12.5));
        assert_eq!(row.commission.as_deref(), Some("Commission: $12.5"));
    }

    #[test]
    fn test_duplicate_ids_in_sibling_branches_allowed() {
        let tree = ReferralNode::new("r", "Root", 0)
            .with_child(ReferralNode::new("a", "A", 1).with_child(ReferralNode::new("x", "X", 2)))
            .with_child(ReferralNode::new("b", "B", 1).with_child(ReferralNode::new("x", "X", 2)));
        assert_eq!(render(&tree).unwrap().len(), 5);
    }
}
