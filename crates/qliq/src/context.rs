//! Tree-processing configuration

use crate::error::TreeError;
use crate::tree::FieldNames;

/// Default ceiling on tree nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Highest ceiling a configuration may ask for.
///
/// Parsing, normalizing and rendering all recurse once per level, so this
/// bounds their stack use.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Configuration shared by [`normalize`](crate::tree::normalize) and
/// [`render_with`](crate::render::render_with).
///
/// Controls how deep a referral tree may nest before it is rejected and which
/// server-side field names map onto the canonical [`ReferralNode`] fields.
///
/// [`ReferralNode`]: crate::tree::ReferralNode
#[derive(Debug, Clone)]
pub struct TreeContext {
    /// Maximum nesting depth (stack overflow protection); the root is depth 0
    pub max_depth: usize,

    /// Server naming of the raw tree fields
    pub fields: FieldNames,
}

impl Default for TreeContext {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            fields: FieldNames::default(),
        }
    }
}

impl TreeContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Replace the server field naming.
    pub fn with_fields(mut self, fields: FieldNames) -> Self {
        self.fields = fields;
        self
    }

    /// Fail if `depth` lies beyond the configured ceiling.
    pub fn check_depth(&self, depth: usize) -> Result<(), TreeError> {
        if depth > self.max_depth {
            return Err(TreeError::TreeTooDeep {
                depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth_limit() {
        let ctx = TreeContext::new();
        assert_eq!(ctx.max_depth, DEFAULT_MAX_DEPTH);
        assert!(ctx.check_depth(DEFAULT_MAX_DEPTH).is_ok());
    }

    #[test]
    fn test_check_depth_rejects_beyond_max() {
        let ctx = TreeContext::with_max_depth(2);
        assert!(ctx.check_depth(2).is_ok());
        assert_eq!(
            ctx.check_depth(3),
            Err(TreeError::TreeTooDeep { depth: 3, max: 2 })
        );
    }
}
