//! compose::verify
//!
//! Post-build verification of tree invariants.
//!
//! # Checks
//!
//! - Sibling names are unique under every node
//! - Parent/child links agree in both directions
//! - Every non-ignored item reached the committed state
//!
//! A verification failure after a successful placement run indicates a
//! bug in the engine, not in the caller's input. On success the tree's
//! [`Fingerprint`] is returned so callers can assert build determinism.

use std::collections::HashSet;

use thiserror::Error;

use crate::compose::members::{ItemTable, PlacementState};
use crate::core::node::DocumentTree;
use crate::core::types::Fingerprint;

/// Errors from verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Two siblings share a name.
    #[error("duplicate sibling name '{name}' under '{parent}'")]
    DuplicateSiblingName {
        /// Path of the parent node.
        parent: String,
        /// The duplicated name.
        name: String,
    },

    /// A child's parent back-reference disagrees with the child list.
    #[error("inconsistent parent link for '{node}'")]
    InconsistentParentLink {
        /// Path of the offending node.
        node: String,
    },

    /// An item never reached the committed state.
    #[error("item '{item}' was never placed")]
    ItemUnplaced {
        /// The unplaced item's id.
        item: String,
    },
}

/// Verify the finished tree and compute its fingerprint.
pub fn verify(tree: &DocumentTree, items: &ItemTable) -> Result<Fingerprint, VerifyError> {
    let root = tree.root();

    let mut nodes = vec![root];
    nodes.extend(tree.descendants(root));

    for &node in &nodes {
        let mut seen = HashSet::new();
        for &child in tree.children(node) {
            if tree.parent(child) != Some(node) {
                return Err(VerifyError::InconsistentParentLink {
                    node: tree.path_of(child),
                });
            }
            if !seen.insert(tree.name(child).as_str().to_string()) {
                return Err(VerifyError::DuplicateSiblingName {
                    parent: tree.path_of(node),
                    name: tree.name(child).as_str().to_string(),
                });
            }
        }
    }

    for key in items.keys() {
        if items.state(key) != PlacementState::Committed {
            return Err(VerifyError::ItemUnplaced {
                item: items.decl(key).id.to_string(),
            });
        }
    }

    Ok(fingerprint(tree, &nodes))
}

/// Digest the tree in document order: one line per node with its path and
/// attributes.
fn fingerprint(tree: &DocumentTree, nodes: &[crate::core::node::NodeId]) -> Fingerprint {
    let lines: Vec<String> = nodes
        .iter()
        .map(|&node| {
            let path = tree.path_of(node);
            let attrs: Vec<String> = tree
                .attrs(node)
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            format!("{}\t{}", path, attrs.join(","))
        })
        .collect();
    Fingerprint::compute(&lines)
}
