//! Raw JSON to canonical tree conversion

use serde_json::{Map, Value};

use super::ReferralNode;
use crate::context::TreeContext;
use crate::error::TreeError;

/// Convert a raw server tree into a [`ReferralNode`].
///
/// Field names are taken from `ctx.fields`. Values are copied through
/// without coercion: the declared depth is kept even when it disagrees with
/// the node's position, and child order is preserved.
///
/// # Errors
///
/// Returns `MissingField` when a node lacks an identifier, name or depth,
/// `InvalidField` when a field has the wrong JSON type, and `TreeTooDeep`
/// when nesting exceeds `ctx.max_depth`.
///
/// # Example
///
/// ```
/// use qliq::{normalize, TreeContext};
/// use serde_json::json;
///
/// let raw = json!({
///     "_id": "u1", "name": "Root", "level": 0,
///     "downlines": [{ "_id": "u2", "name": "Child", "level": 1, "commissionBalance": 10 }]
/// });
///
/// let root = normalize(&raw, &TreeContext::new()).unwrap();
/// assert_eq!(root.children[0].id, "u2");
/// assert_eq!(root.children[0].balance, Some(10.0));
/// ```
pub fn normalize(raw: &Value, ctx: &TreeContext) -> Result<ReferralNode, TreeError> {
    let mut path = Vec::new();
    normalize_node(raw, ctx, &mut path)
}

/// `path` holds the child index taken at each level above `raw`.
fn normalize_node(
    raw: &Value,
    ctx: &TreeContext,
    path: &mut Vec<usize>,
) -> Result<ReferralNode, TreeError> {
    ctx.check_depth(path.len())?;

    let object = raw.as_object().ok_or_else(|| TreeError::InvalidField {
        field: "node".to_string(),
        path: describe(path, ctx),
        expected: "object",
    })?;

    let fields = &ctx.fields;
    let id = identifier(object, ctx, path)?;

    let display_name = match present(object, &fields.name) {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(invalid(&fields.name, path, ctx, "string")),
        None => return Err(missing("displayName", path, ctx)),
    };

    let depth = match present(object, &fields.depth) {
        Some(value) => value
            .as_u64()
            .and_then(|d| u32::try_from(d).ok())
            .ok_or_else(|| invalid(&fields.depth, path, ctx, "non-negative integer"))?,
        None => return Err(missing("depth", path, ctx)),
    };

    let email = match present(object, &fields.email) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(invalid(&fields.email, path, ctx, "string")),
        None => None,
    };

    let balance = match present(object, &fields.balance) {
        Some(value) => Some(
            value
                .as_f64()
                .ok_or_else(|| invalid(&fields.balance, path, ctx, "number"))?,
        ),
        None => None,
    };

    let children = match present(object, &fields.children) {
        Some(Value::Array(items)) => {
            let mut children = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(index);
                let child = normalize_node(item, ctx, path);
                path.pop();
                children.push(child?);
            }
            children
        }
        Some(_) => return Err(invalid(&fields.children, path, ctx, "array")),
        None => Vec::new(),
    };

    Ok(ReferralNode {
        id,
        display_name,
        email,
        depth,
        balance,
        children,
    })
}

fn identifier(
    object: &Map<String, Value>,
    ctx: &TreeContext,
    path: &[usize],
) -> Result<String, TreeError> {
    for alias in &ctx.fields.id {
        match present(object, alias) {
            Some(Value::String(s)) => return Ok(s.clone()),
            Some(_) => return Err(invalid(alias, path, ctx, "string")),
            None => continue,
        }
    }
    Err(missing("id", path, ctx))
}

/// Look up `key`, treating JSON `null` the same as an absent key.
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn missing(field: &str, path: &[usize], ctx: &TreeContext) -> TreeError {
    TreeError::MissingField {
        field: field.to_string(),
        path: describe(path, ctx),
    }
}

fn invalid(field: &str, path: &[usize], ctx: &TreeContext, expected: &'static str) -> TreeError {
    TreeError::InvalidField {
        field: field.to_string(),
        path: describe(path, ctx),
        expected,
    }
}

/// Render a location like `root.downlines[0].downlines[2]`.
fn describe(path: &[usize], ctx: &TreeContext) -> String {
    let mut out = String::from("root");
    for index in path {
        out.push_str(&format!(".{}[{}]", ctx.fields.children, index));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_nested_path() {
        let ctx = TreeContext::new();
        assert_eq!(describe(&[], &ctx), "root");
        assert_eq!(describe(&[0, 2], &ctx), "root.downlines[0].downlines[2]");
    }

    #[test]
    fn test_null_fields_count_as_absent() {
        let raw = json!({
            "_id": "u1", "name": "Root", "level": 0,
            "email": null, "commissionBalance": null, "downlines": null
        });
        let node = normalize(&raw, &TreeContext::new()).unwrap();
        assert_eq!(node.email, None);
        assert_eq!(node.balance, None);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_id_alias_fallback() {
        let raw = json!({ "id": "plain", "name": "Root", "level": 0 });
        let node = normalize(&raw, &TreeContext::new()).unwrap();
        assert_eq!(node.id, "plain");
    }

    #[test]
    fn test_non_object_node_rejected() {
        let err = normalize(&json!("u1"), &TreeContext::new()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidField { expected: "object", .. }
        ));
    }
}
