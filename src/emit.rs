//! emit
//!
//! Serialization of a composed tree.
//!
//! The engine itself performs no I/O; these functions turn a finished
//! [`DocumentTree`] into data the caller can write wherever it likes.
//! Two shapes are supported:
//!
//! - **JSON**: one object per node (`name`, `attributes`, `children`),
//!   attribute order preserved
//! - **Outline**: indented plain text for terminals
//!
//! # Example
//!
//! ```
//! use folio::core::node::DocumentTree;
//! use folio::emit;
//!
//! let mut tree = DocumentTree::new("form");
//! tree.get_or_create_target(tree.root(), "a/b");
//!
//! let json = emit::to_json(&tree);
//! assert_eq!(json["name"], "form");
//! assert_eq!(json["children"][0]["children"][0]["name"], "b");
//!
//! let outline = emit::to_outline(&tree);
//! assert!(outline.contains("  a [node]"));
//! ```

use serde_json::{json, Value};

use crate::core::attrs::KIND_KEY;
use crate::core::node::{DocumentTree, NodeId};

/// Serialize the whole tree to a JSON value.
pub fn to_json(tree: &DocumentTree) -> Value {
    node_to_json(tree, tree.root())
}

/// Serialize one subtree to a JSON value.
pub fn node_to_json(tree: &DocumentTree, node: NodeId) -> Value {
    let mut attributes = serde_json::Map::new();
    for (key, value) in tree.attrs(node) {
        attributes.insert(key.clone(), Value::String(value.clone()));
    }

    let children: Vec<Value> = tree
        .children(node)
        .iter()
        .map(|&child| node_to_json(tree, child))
        .collect();

    json!({
        "name": tree.name(node).as_str(),
        "attributes": Value::Object(attributes),
        "children": children,
    })
}

/// Serialize the whole tree to pretty-printed JSON text.
pub fn to_json_string(tree: &DocumentTree) -> String {
    // Valid JSON by construction.
    serde_json::to_string_pretty(&to_json(tree)).unwrap_or_default()
}

/// Render the whole tree as an indented outline.
pub fn to_outline(tree: &DocumentTree) -> String {
    let mut out = String::new();
    outline_node(tree, tree.root(), 0, &mut out);
    out
}

/// Render one subtree as an indented outline.
pub fn node_to_outline(tree: &DocumentTree, node: NodeId) -> String {
    let mut out = String::new();
    outline_node(tree, node, 0, &mut out);
    out
}

fn outline_node(tree: &DocumentTree, node: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let kind = tree.attr(node, KIND_KEY).unwrap_or("node");
    out.push_str(&format!("{indent}{} [{kind}]", tree.name(node)));

    for (key, value) in tree.attrs(node) {
        if key == KIND_KEY {
            continue;
        }
        out.push_str(&format!(" {key}={value:?}"));
    }
    out.push('\n');

    for &child in tree.children(node) {
        outline_node(tree, child, depth + 1, out);
    }
}
