//! Property-based tests for core domain algorithms.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use folio::core::attrs::{format_set, merge_value, parse_set};
use folio::core::naming::{slugify, uniquify};
use folio::core::order::Orderer;
use folio::core::path::{join, split, Segment};

/// Strategy for a random edge list over `len` entries.
fn edges(len: usize) -> impl Strategy<Value = Vec<(bool, usize, usize)>> {
    prop::collection::vec(
        (any::<bool>(), 0..len.max(1), 0..len.max(1)),
        0..(len * 2).max(1),
    )
}

/// Strategy for path-safe node names: non-empty, no quotes, not dots.
fn path_safe_name() -> impl Strategy<Value = String> {
    "[a-z0-9_/ ]{1,12}".prop_filter("not dots or empty-ish", |s| {
        let trimmed = s.trim();
        !trimmed.is_empty()
            && trimmed == s
            && s != "."
            && s != ".."
            && s.split('/').all(|seg| !seg.is_empty())
    })
}

proptest! {
    /// The resolver output is always a permutation of the input.
    #[test]
    fn resolver_output_is_permutation(len in 0usize..12, edge_list in edges(12)) {
        let mut orderer = Orderer::new(len);
        for (before, a, b) in edge_list {
            if a < len && b < len {
                if before {
                    orderer.declare_before(a, b);
                } else {
                    orderer.declare_after(a, b);
                }
            }
        }

        let mut order = orderer.resolve().order;
        order.sort_unstable();
        let expected: Vec<usize> = (0..len).collect();
        prop_assert_eq!(order, expected);
    }

    /// For acyclic constraint sets (edges only point forward in index
    /// order), the output is a valid topological order with no drops.
    #[test]
    fn resolver_acyclic_is_topological(len in 2usize..12, edge_list in edges(12)) {
        let mut forward: Vec<(usize, usize)> = Vec::new();
        let mut orderer = Orderer::new(len);
        for (_, a, b) in edge_list {
            if a < len && b < len && a < b {
                orderer.declare_before(a, b);
                forward.push((a, b));
            }
        }

        let resolution = orderer.resolve();
        prop_assert!(resolution.dropped.is_empty());

        let pos: Vec<usize> = {
            let mut positions = vec![0; len];
            for (index, &entry) in resolution.order.iter().enumerate() {
                positions[entry] = index;
            }
            positions
        };
        for (earlier, later) in forward {
            prop_assert!(pos[earlier] < pos[later], "{} must precede {}", earlier, later);
        }
    }

    /// With no constraints at all the input order is untouched.
    #[test]
    fn resolver_identity_without_edges(len in 0usize..24) {
        let orderer = Orderer::new(len);
        let expected: Vec<usize> = (0..len).collect();
        prop_assert_eq!(orderer.resolve().order, expected);
    }

    /// Uniquify never returns a taken name and always keeps the desired
    /// name as a prefix.
    #[test]
    fn uniquify_avoids_taken(desired in "[a-z]{1,8}", taken in prop::collection::hash_set("[a-z_0-9]{1,10}", 0..20)) {
        let result = uniquify(&desired, |c| taken.contains(c));
        prop_assert!(!taken.contains(&result));
        prop_assert!(result.starts_with(&desired));
    }

    /// Slugs contain only lowercase alphanumerics and underscores and
    /// respect the length cap.
    #[test]
    fn slugify_is_clean(input in ".{0,40}", max_len in 1usize..60) {
        let slug = slugify(&input, max_len);
        prop_assert!(!slug.is_empty());
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(slug.chars().count() <= max_len.max("node".len()));
    }

    /// Path splitting never panics, and join/split round-trips quote-free
    /// names (including names with embedded separators).
    #[test]
    fn path_join_split_roundtrip(names in prop::collection::vec(path_safe_name(), 1..5)) {
        let path = join(names.iter().map(String::as_str));
        let segments = split(&path);

        let expected: Vec<Segment> = names
            .iter()
            .map(|n| Segment::Named(n.clone()))
            .collect();
        prop_assert_eq!(segments, expected);
    }

    /// Splitting arbitrary input is total.
    #[test]
    fn path_split_total(input in ".{0,60}") {
        let _ = split(&input);
    }

    /// Set-union merge keeps every element from both sides exactly once.
    #[test]
    fn set_merge_is_union(
        old in prop::collection::vec("[a-z]{1,6}", 0..6),
        new in prop::collection::vec("[a-z]{1,6}", 0..6),
    ) {
        let old_encoded = format_set(old.iter().map(String::as_str));
        let new_encoded = format_set(new.iter().map(String::as_str));
        let merged = merge_value(Some(&old_encoded), &new_encoded);
        let elements = parse_set(&merged);

        for e in old.iter().chain(new.iter()) {
            prop_assert!(elements.contains(e));
        }
        let unique: std::collections::HashSet<_> = elements.iter().collect();
        prop_assert_eq!(unique.len(), elements.len());
    }
}
