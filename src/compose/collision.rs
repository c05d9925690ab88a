//! compose::collision
//!
//! The collision solver: sibling naming collisions and mutual/circular
//! nesting requests.
//!
//! # Duties
//!
//! 1. **Sibling naming**: node creation goes through
//!    [`create_child_reporting`], which delegates to the tree's
//!    unique-name generator and records every automatic rename as an
//!    info-severity issue. Names are assigned in batch order, so repeated
//!    runs over identical input order produce identical names.
//! 2. **Mutual nesting**: before a tentative node is relocated,
//!    [`would_cycle`] walks the candidate parent's ancestor chain looking
//!    for the node being moved. Because claims happen one link at a time,
//!    every earlier link of an N-way cycle is already committed to the
//!    tree when the closing link is attempted, so the single walk sees
//!    chains of any length from both endpoints across successive claims.

use crate::compose::report::{BuildIssue, IssueSink};
use crate::core::node::{DocumentTree, NodeId};

/// Create a child node, reporting the rename when the desired name was
/// taken.
pub fn create_child_reporting(
    tree: &mut DocumentTree,
    parent: NodeId,
    desired: &str,
    kind: &str,
    sink: &mut dyn IssueSink,
) -> NodeId {
    let node = tree.add_child(parent, desired, kind);
    let assigned = tree.name(node).as_str().to_string();
    if assigned != desired {
        sink.report(BuildIssue::NameCollision {
            parent: tree.path_of(parent),
            requested: desired.to_string(),
            assigned,
        });
    }
    node
}

/// Whether relocating `moving` under `target_parent` would close a
/// containment cycle.
pub fn would_cycle(tree: &DocumentTree, moving: NodeId, target_parent: NodeId) -> bool {
    moving == target_parent || tree.is_ancestor_of(moving, target_parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::report::BuildReport;
    use crate::core::node::DEFAULT_KIND;

    #[test]
    fn first_child_keeps_desired_name() {
        let mut tree = DocumentTree::new("root");
        let root = tree.root();
        let mut report = BuildReport::new();

        let node = create_child_reporting(&mut tree, root, "item", DEFAULT_KIND, &mut report);
        assert_eq!(tree.name(node).as_str(), "item");
        assert!(report.issues.is_empty());
    }

    #[test]
    fn collision_renames_and_reports() {
        let mut tree = DocumentTree::new("root");
        let root = tree.root();
        let mut report = BuildReport::new();

        create_child_reporting(&mut tree, root, "item", DEFAULT_KIND, &mut report);
        let second = create_child_reporting(&mut tree, root, "item", DEFAULT_KIND, &mut report);

        assert_eq!(tree.name(second).as_str(), "item_1");
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(
            &report.issues[0],
            BuildIssue::NameCollision { requested, assigned, .. }
                if requested == "item" && assigned == "item_1"
        ));
    }

    #[test]
    fn naming_is_deterministic_across_runs() {
        let run = || {
            let mut tree = DocumentTree::new("root");
            let root = tree.root();
            let mut report = BuildReport::new();
            let names: Vec<String> = ["x", "x", "y", "x"]
                .iter()
                .map(|d| {
                    let node =
                        create_child_reporting(&mut tree, root, d, DEFAULT_KIND, &mut report);
                    tree.name(node).as_str().to_string()
                })
                .collect();
            names
        };

        assert_eq!(run(), run());
        assert_eq!(run(), vec!["x", "x_1", "y", "x_2"]);
    }

    #[test]
    fn cycle_detected_for_descendant_target() {
        let mut tree = DocumentTree::new("root");
        let root = tree.root();
        let a = tree.get_or_create_target(root, "a");
        let inner = tree.get_or_create_target(root, "a/inner");

        assert!(would_cycle(&tree, a, inner));
        assert!(would_cycle(&tree, a, a));
    }

    #[test]
    fn unrelated_targets_are_clear() {
        let mut tree = DocumentTree::new("root");
        let root = tree.root();
        let a = tree.get_or_create_target(root, "a");
        let b = tree.get_or_create_target(root, "b");

        assert!(!would_cycle(&tree, a, b));
        // Moving under an ancestor flattens; no cycle.
        assert!(!would_cycle(&tree, a, root));
    }
}
