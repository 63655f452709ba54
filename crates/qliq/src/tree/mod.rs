//! Canonical referral ("downline") tree

mod fields;
mod normalize;

pub use fields::FieldNames;
pub use normalize::normalize;

use serde::{Deserialize, Serialize};

/// One member of a downline hierarchy.
///
/// Produced by [`normalize`] from the server payload and treated as
/// immutable afterwards; the renderer only reads it.
///
/// # Example
///
/// ```
/// use qliq::ReferralNode;
///
/// let root = ReferralNode::new("u1", "Root", 0)
///     .with_child(ReferralNode::new("u2", "Child", 1).with_balance(10.0));
///
/// assert_eq!(root.node_count(), 2);
/// assert_eq!(root.children[0].balance, Some(10.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralNode {
    /// Opaque identifier, expected to be unique within the tree
    pub id: String,

    /// Human-readable name
    pub display_name: String,

    /// Contact address, if the server sent one
    pub email: Option<String>,

    /// Declared distance from the root (root = 0), passed through unchecked
    pub depth: u32,

    /// Commission balance, if the server sent one
    pub balance: Option<f64>,

    /// Direct recruits, in server order
    pub children: Vec<ReferralNode>,
}

impl ReferralNode {
    /// Create a childless node without email or balance.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, depth: u32) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: None,
            depth,
            balance: None,
            children: Vec::new(),
        }
    }

    /// Attach an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach a commission balance.
    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Append a direct child.
    pub fn with_child(mut self, child: ReferralNode) -> Self {
        self.children.push(child);
        self
    }

    /// Whether this node has no recruits.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of levels below this node (0 for a leaf).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            height = height.max(level);
            stack.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        height
    }
}
