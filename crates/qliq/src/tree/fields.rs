//! Server-side naming of raw tree fields

/// Maps the server's raw field names onto [`ReferralNode`](super::ReferralNode).
///
/// The defaults match the `/users/mlm-tree-user` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Identifier aliases, tried in order; the first non-null one wins
    pub id: Vec<String>,
    /// Display name
    pub name: String,
    /// Optional contact address
    pub email: String,
    /// Declared depth
    pub depth: String,
    /// Optional commission balance
    pub balance: String,
    /// Child list
    pub children: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: vec!["_id".to_string(), "id".to_string()],
            name: "name".to_string(),
            email: "email".to_string(),
            depth: "level".to_string(),
            balance: "commissionBalance".to_string(),
            children: "downlines".to_string(),
        }
    }
}
