//! core::order
//!
//! The before/after ordering resolver.
//!
//! Turns a set of precedence constraints over a list of entries into a
//! permutation of that list. Acyclic constraint graphs resolve to a valid
//! topological order; cyclic graphs never fail — edges whose target is
//! mid-visit are dropped and reported, so the resolver is total.
//!
//! # Algorithm
//!
//! - Entries touching no edge bypass the graph entirely and re-enter the
//!   result at their original indices afterwards, so unconstrained entries
//!   keep their relative order.
//! - Every edge is double-registered: the later entry records it as a
//!   predecessor edge, the earlier entry as a successor edge. Adjacency
//!   lists are newest-first; each edge remembers its declaration index.
//! - Depth-first walk in original list order: visit predecessors, place
//!   the entry, visit successors. A predecessor edge whose earlier side is
//!   currently mid-visit closes a cycle: it is dropped from traversal (but
//!   still bounds placement, so it is honored whenever the surviving
//!   positions allow). A mid-visit successor is just an enclosing frame
//!   and is skipped silently.
//! - Placement position: after the last already-placed predecessor, but
//!   never past the earliest already-placed successor. When the two bounds
//!   conflict (reachable only through cycles), the side whose governing
//!   edge was declared earliest wins.
//!
//! # Example
//!
//! ```
//! use folio::core::order::Orderer;
//!
//! // 0 must precede 2, 2 must precede 1.
//! let mut orderer = Orderer::new(3);
//! orderer.declare_before(0, 2);
//! orderer.declare_before(2, 1);
//!
//! let resolution = orderer.resolve();
//! assert_eq!(resolution.order, vec![0, 2, 1]);
//! assert!(resolution.dropped.is_empty());
//! ```

/// One declared precedence edge: `earlier` must come before `later`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub earlier: usize,
    pub later: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unvisited,
    Visiting,
    Placed,
}

/// The resolver. Declare edges, then call [`Orderer::resolve`].
#[derive(Debug)]
pub struct Orderer {
    len: usize,
    edges: Vec<Edge>,
    dropped: Vec<bool>,
    /// Edge indices where this entry is the later side, newest first.
    preds: Vec<Vec<usize>>,
    /// Edge indices where this entry is the earlier side, newest first.
    succs: Vec<Vec<usize>>,
}

/// The outcome of a resolution.
#[derive(Debug)]
pub struct Resolution {
    /// A permutation of `0..len`.
    pub order: Vec<usize>,
    /// Edges dropped during traversal because they closed a cycle.
    pub dropped: Vec<Edge>,
}

impl Orderer {
    /// Create a resolver over `len` entries (indices `0..len`).
    pub fn new(len: usize) -> Self {
        Self {
            len,
            edges: Vec::new(),
            dropped: Vec::new(),
            preds: vec![Vec::new(); len],
            succs: vec![Vec::new(); len],
        }
    }

    fn declare(&mut self, earlier: usize, later: usize) {
        debug_assert!(earlier < self.len && later < self.len);
        let edge_idx = self.edges.len();
        self.edges.push(Edge { earlier, later });
        self.dropped.push(false);
        self.preds[later].insert(0, edge_idx);
        self.succs[earlier].insert(0, edge_idx);
    }

    /// Declare that `entry` must precede `target`.
    pub fn declare_before(&mut self, entry: usize, target: usize) {
        self.declare(entry, target);
    }

    /// Declare that `entry` must follow `target`.
    pub fn declare_after(&mut self, entry: usize, target: usize) {
        self.declare(target, entry);
    }

    /// Whether the entry participates in any edge.
    fn is_constrained(&self, entry: usize) -> bool {
        !self.preds[entry].is_empty() || !self.succs[entry].is_empty()
    }

    /// Resolve to a permutation of the input indices.
    pub fn resolve(mut self) -> Resolution {
        let mut state = vec![State::Unvisited; self.len];
        // Placed constrained entries, in working order.
        let mut out: Vec<usize> = Vec::new();

        for entry in 0..self.len {
            if self.is_constrained(entry) {
                self.visit(entry, &mut state, &mut out);
            }
        }

        // Unconstrained entries re-enter at their original indices.
        for entry in 0..self.len {
            if !self.is_constrained(entry) {
                let at = entry.min(out.len());
                out.insert(at, entry);
            }
        }

        let dropped = self
            .edges
            .iter()
            .zip(&self.dropped)
            .filter(|(_, dropped)| **dropped)
            .map(|(edge, _)| *edge)
            .collect();

        Resolution {
            order: out,
            dropped,
        }
    }

    fn visit(&mut self, entry: usize, state: &mut [State], out: &mut Vec<usize>) {
        if state[entry] != State::Unvisited {
            return;
        }
        state[entry] = State::Visiting;

        let pred_edges = self.preds[entry].clone();
        for edge_idx in pred_edges {
            let earlier = self.edges[edge_idx].earlier;
            if state[earlier] == State::Visiting {
                self.dropped[edge_idx] = true;
                continue;
            }
            self.visit(earlier, state, out);
        }

        self.place(entry, state, out);
        state[entry] = State::Placed;

        let succ_edges = self.succs[entry].clone();
        for edge_idx in succ_edges {
            let later = self.edges[edge_idx].later;
            if state[later] == State::Visiting {
                // The successor's own frame is mid-flight and will apply
                // this bound when it places itself; not a cycle by itself.
                continue;
            }
            self.visit(later, state, out);
        }
    }

    /// Insert the entry into the working order.
    ///
    /// Dropped edges still contribute bounds here: a cycle edge is only
    /// relaxed, and is honored whenever the surviving positions allow it.
    fn place(&self, entry: usize, state: &[State], out: &mut Vec<usize>) {
        let position_of = |other: usize| -> Option<usize> {
            if state[other] == State::Placed {
                out.iter().position(|&e| e == other)
            } else {
                None
            }
        };

        // Lower bound: one past the last placed predecessor.
        let mut lo = 0usize;
        let mut pred_decl: Option<usize> = None;
        for &edge_idx in self.preds[entry].iter().rev() {
            if let Some(pos) = position_of(self.edges[edge_idx].earlier) {
                lo = lo.max(pos + 1);
                pred_decl = Some(pred_decl.map_or(edge_idx, |d: usize| d.min(edge_idx)));
            }
        }

        // Upper bound: the earliest placed successor.
        let mut hi = out.len();
        let mut succ_decl: Option<usize> = None;
        for &edge_idx in self.succs[entry].iter().rev() {
            if let Some(pos) = position_of(self.edges[edge_idx].later) {
                hi = hi.min(pos);
                succ_decl = Some(succ_decl.map_or(edge_idx, |d: usize| d.min(edge_idx)));
            }
        }

        let at = if lo <= hi {
            hi
        } else {
            // Conflicting bounds: the earliest-declared edge wins.
            match (pred_decl, succ_decl) {
                (Some(p), Some(s)) if s < p => hi,
                _ => lo,
            }
        };

        out.insert(at.min(out.len()), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_of(orderer: Orderer) -> Vec<usize> {
        orderer.resolve().order
    }

    #[test]
    fn no_edges_keeps_input_order() {
        let orderer = Orderer::new(5);
        assert_eq!(order_of(orderer), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn empty_input() {
        let orderer = Orderer::new(0);
        assert_eq!(order_of(orderer), Vec::<usize>::new());
    }

    #[test]
    fn single_before_edge() {
        let mut orderer = Orderer::new(2);
        orderer.declare_before(1, 0);
        assert_eq!(order_of(orderer), vec![1, 0]);
    }

    #[test]
    fn single_after_edge() {
        let mut orderer = Orderer::new(2);
        orderer.declare_after(0, 1);
        assert_eq!(order_of(orderer), vec![1, 0]);
    }

    #[test]
    fn chain_resolves_topologically() {
        // 2 -> 1 -> 0 by "before" declarations.
        let mut orderer = Orderer::new(3);
        orderer.declare_before(2, 1);
        orderer.declare_before(1, 0);
        assert_eq!(order_of(orderer), vec![2, 1, 0]);
    }

    #[test]
    fn diamond_is_valid_topological_order() {
        // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
        let mut orderer = Orderer::new(4);
        orderer.declare_before(0, 1);
        orderer.declare_before(0, 2);
        orderer.declare_before(1, 3);
        orderer.declare_before(2, 3);

        let resolution = orderer.resolve();
        let pos = |e: usize| resolution.order.iter().position(|&x| x == e).unwrap();
        assert!(pos(0) < pos(1));
        assert!(pos(0) < pos(2));
        assert!(pos(1) < pos(3));
        assert!(pos(2) < pos(3));
        assert!(resolution.dropped.is_empty());
    }

    #[test]
    fn simple_four_cycle_keeps_original_order() {
        // 0 before 1 before 2 before 3 before 0: the cycle-closing edge is
        // dropped and the original order survives.
        let mut orderer = Orderer::new(4);
        orderer.declare_before(0, 1);
        orderer.declare_before(1, 2);
        orderer.declare_before(2, 3);
        orderer.declare_before(3, 0);

        let resolution = orderer.resolve();
        assert_eq!(resolution.order, vec![0, 1, 2, 3]);
        assert!(!resolution.dropped.is_empty());
    }

    #[test]
    fn larger_cycle_with_extra_edges() {
        // 0->1->2->3->1 plus 5->1 and 6->1; entry 4 is unconstrained.
        let mut orderer = Orderer::new(7);
        orderer.declare_before(0, 1);
        orderer.declare_before(1, 2);
        orderer.declare_before(2, 3);
        orderer.declare_before(3, 1);
        orderer.declare_before(5, 1);
        orderer.declare_before(6, 1);

        let resolution = orderer.resolve();
        assert_eq!(resolution.order, vec![0, 6, 5, 2, 3, 4, 1]);
    }

    #[test]
    fn two_cycle_drops_closing_edge() {
        let mut orderer = Orderer::new(2);
        orderer.declare_before(0, 1);
        orderer.declare_before(1, 0);

        let resolution = orderer.resolve();
        assert_eq!(resolution.order.len(), 2);
        assert_eq!(resolution.dropped.len(), 1);
    }

    #[test]
    fn self_edge_is_dropped() {
        let mut orderer = Orderer::new(2);
        orderer.declare_before(0, 0);

        let resolution = orderer.resolve();
        assert_eq!(resolution.order, vec![0, 1]);
        assert_eq!(resolution.dropped, vec![Edge { earlier: 0, later: 0 }]);
    }

    #[test]
    fn output_is_permutation_under_cycles() {
        let mut orderer = Orderer::new(6);
        orderer.declare_before(0, 1);
        orderer.declare_before(1, 0);
        orderer.declare_after(3, 5);
        orderer.declare_before(5, 3);

        let mut order = orderer.resolve().order;
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn unconstrained_entries_keep_relative_order() {
        // Only 1 and 4 are constrained; 0, 2, 3 stay put relative to each
        // other.
        let mut orderer = Orderer::new(5);
        orderer.declare_before(4, 1);

        let order = order_of(orderer);
        let pos = |e: usize| order.iter().position(|&x| x == e).unwrap();
        assert!(pos(4) < pos(1));
        assert!(pos(0) < pos(2));
        assert!(pos(2) < pos(3));
    }
}
