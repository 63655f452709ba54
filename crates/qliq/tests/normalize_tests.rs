//! Referral tree normalization tests

use pretty_assertions::assert_eq;
use qliq::*;
use serde_json::{json, Value};

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

/// A single-branch raw tree with `len` nodes, depths 0..len.
fn raw_chain(len: usize) -> Value {
    let last = len - 1;
    let mut node = json!({
        "_id": format!("u{last}"),
        "name": format!("User {last}"),
        "level": last,
        "downlines": []
    });
    for depth in (0..last).rev() {
        node = json!({
            "_id": format!("u{depth}"),
            "name": format!("User {depth}"),
            "level": depth,
            "downlines": [node]
        });
    }
    node
}

/// A raw tree where every node above `levels` has `fanout` children.
fn raw_full(levels: u32, fanout: usize) -> Value {
    fn build(depth: u32, levels: u32, fanout: usize, id: &str) -> Value {
        let children: Vec<Value> = if depth < levels {
            (0..fanout)
                .map(|i| build(depth + 1, levels, fanout, &format!("{id}.{i}")))
                .collect()
        } else {
            Vec::new()
        };
        json!({ "_id": id, "name": id, "level": depth, "downlines": children })
    }
    build(0, levels, fanout, "r")
}

fn raw_count(raw: &Value) -> usize {
    1 + raw["downlines"]
        .as_array()
        .map_or(0, |c| c.iter().map(raw_count).sum())
}

fn assert_depths_step_by_one(node: &ReferralNode) {
    for child in &node.children {
        assert_eq!(child.depth, node.depth + 1, "child {} of {}", child.id, node.id);
        assert_depths_step_by_one(child);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Shape preservation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_node_count_preserved() {
    for raw in [raw_chain(1), raw_chain(2), raw_chain(12), raw_full(3, 3)] {
        let tree = normalize(&raw, &TreeContext::new()).unwrap();
        assert_eq!(tree.node_count(), raw_count(&raw));
        assert_eq!(tree.depth, 0);
        assert_depths_step_by_one(&tree);
    }
}

#[test]
fn test_example_payload() {
    let raw = json!({
        "_id": "u1", "name": "Root", "level": 0,
        "downlines": [{
            "_id": "u2", "name": "Child", "level": 1,
            "commissionBalance": 10, "downlines": []
        }]
    });

    let tree = normalize(&raw, &TreeContext::new()).unwrap();
    let expected = ReferralNode::new("u1", "Root", 0)
        .with_child(ReferralNode::new("u2", "Child", 1).with_balance(10.0));
    assert_eq!(tree, expected);
}

#[test]
fn test_children_keep_server_order() {
    let raw = json!({
        "_id": "r", "name": "Root", "level": 0,
        "downlines": [
            { "_id": "z", "name": "Zed", "level": 1 },
            { "_id": "a", "name": "Ann", "level": 1 },
            { "_id": "m", "name": "Max", "level": 1 }
        ]
    });
    let tree = normalize(&raw, &TreeContext::new()).unwrap();
    let ids: Vec<&str> = tree.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}

#[test]
fn test_missing_downlines_yields_leaf() {
    let raw = json!({ "_id": "r", "name": "Root", "level": 0 });
    let tree = normalize(&raw, &TreeContext::new()).unwrap();
    assert!(tree.is_leaf());
}

#[test]
fn test_optional_fields_copied() {
    let raw = json!({
        "_id": "r", "name": "Root", "level": 0,
        "email": "root@x.io", "commissionBalance": 0
    });
    let tree = normalize(&raw, &TreeContext::new()).unwrap();
    assert_eq!(tree.email.as_deref(), Some("root@x.io"));
    assert_eq!(tree.balance, Some(0.0));
}

#[test]
fn test_declared_depth_passed_through() {
    let raw = json!({
        "_id": "r", "name": "Root", "level": 0,
        "downlines": [{ "_id": "c", "name": "Child", "level": 5 }]
    });
    let tree = normalize(&raw, &TreeContext::new()).unwrap();
    assert_eq!(tree.children[0].depth, 5);
}

#[test]
fn test_unknown_fields_ignored() {
    let raw = json!({
        "_id": "r", "name": "Root", "level": 0,
        "referralCode": "R1", "createdAt": "2024-01-01"
    });
    assert!(normalize(&raw, &TreeContext::new()).is_ok());
}

// ═══════════════════════════════════════════════════════════════════════
// Required fields
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_root_id() {
    let raw = json!({ "name": "Root", "level": 0 });
    assert_eq!(
        normalize(&raw, &TreeContext::new()),
        Err(TreeError::MissingField {
            field: "id".into(),
            path: "root".into(),
        })
    );
}

#[test]
fn test_missing_nested_id() {
    let raw = json!({
        "_id": "r", "name": "Root", "level": 0,
        "downlines": [
            { "_id": "a", "name": "A", "level": 1 },
            { "_id": "b", "name": "B", "level": 1, "downlines": [
                { "_id": "c", "name": "C", "level": 2 },
                { "_id": "d", "name": "D", "level": 2 },
                { "name": "nameless", "level": 2 }
            ]}
        ]
    });
    assert_eq!(
        normalize(&raw, &TreeContext::new()),
        Err(TreeError::MissingField {
            field: "id".into(),
            path: "root.downlines[1].downlines[2]".into(),
        })
    );
}

#[test]
fn test_null_id_is_missing() {
    let raw = json!({ "_id": null, "name": "Root", "level": 0 });
    assert!(matches!(
        normalize(&raw, &TreeContext::new()),
        Err(TreeError::MissingField { .. })
    ));
}

#[test]
fn test_missing_name_and_level() {
    let no_name = json!({ "_id": "r", "level": 0 });
    assert!(matches!(
        normalize(&no_name, &TreeContext::new()),
        Err(TreeError::MissingField { field, .. }) if field == "displayName"
    ));

    let no_level = json!({ "_id": "r", "name": "Root" });
    assert!(matches!(
        normalize(&no_level, &TreeContext::new()),
        Err(TreeError::MissingField { field, .. }) if field == "depth"
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Type mismatches
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_negative_level_rejected() {
    let raw = json!({ "_id": "r", "name": "Root", "level": -1 });
    assert!(matches!(
        normalize(&raw, &TreeContext::new()),
        Err(TreeError::InvalidField { field, expected: "non-negative integer", .. }) if field == "level"
    ));
}

#[test]
fn test_string_balance_rejected() {
    let raw = json!({ "_id": "r", "name": "Root", "level": 0, "commissionBalance": "10" });
    assert!(matches!(
        normalize(&raw, &TreeContext::new()),
        Err(TreeError::InvalidField { expected: "number", .. })
    ));
}

#[test]
fn test_downlines_must_be_array() {
    let raw = json!({ "_id": "r", "name": "Root", "level": 0, "downlines": {} });
    assert!(matches!(
        normalize(&raw, &TreeContext::new()),
        Err(TreeError::InvalidField { expected: "array", .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Limits and naming
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_tree_too_deep() {
    let ctx = TreeContext::with_max_depth(3);
    assert!(normalize(&raw_chain(4), &ctx).is_ok());
    assert_eq!(
        normalize(&raw_chain(6), &ctx),
        Err(TreeError::TreeTooDeep { depth: 4, max: 3 })
    );
}

#[test]
fn test_custom_field_names() {
    let fields = FieldNames {
        id: vec!["uid".into()],
        name: "fullName".into(),
        email: "mail".into(),
        depth: "depth".into(),
        balance: "balance".into(),
        children: "recruits".into(),
    };
    let ctx = TreeContext::new().with_fields(fields);
    let raw = json!({
        "uid": "r", "fullName": "Root", "depth": 0, "balance": 2.5,
        "recruits": [{ "uid": "c", "fullName": "Child", "depth": 1, "mail": "c@x.io" }]
    });

    let tree = normalize(&raw, &ctx).unwrap();
    assert_eq!(tree.balance, Some(2.5));
    assert_eq!(tree.children[0].email.as_deref(), Some("c@x.io"));
}
