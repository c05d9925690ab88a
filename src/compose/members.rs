//! compose::members
//!
//! Placement bookkeeping: the item table and the members registry.
//!
//! # Architecture
//!
//! All items of a build live in one [`ItemTable`], addressed by
//! [`ItemKey`] and carrying an explicit three-state [`PlacementState`].
//! The [`MembersRegistry`] tracks which items are still available per
//! scope: one frame per scope, the innermost last, each frame owning its
//! own list.
//!
//! # Delegation discipline
//!
//! Checking an item out removes it from the current frame *and every
//! ancestor frame* before the scope returns, so a sibling scope processed
//! afterwards never re-offers an already-placed item. Soft checkout leaves
//! the bookkeeping of every frame untouched: a tentatively placed item is
//! still claimable by a more specific scope.

use crate::core::node::NodeId;
use crate::provider::ItemDecl;

/// Handle to one item in the build's [`ItemTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey(pub(crate) usize);

/// Where an item stands in the placement lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    /// Not placed anywhere yet.
    Available,
    /// Rendered at a fallback node, claimable by a more specific scope.
    Tentative(NodeId),
    /// Finally placed; never moves again.
    Committed,
}

/// One item plus its placement state.
#[derive(Debug)]
pub struct ItemEntry {
    /// The declaration as supplied by the item source.
    pub decl: ItemDecl,
    /// Current placement state.
    pub state: PlacementState,
}

/// All items of one build.
#[derive(Debug, Default)]
pub struct ItemTable {
    entries: Vec<ItemEntry>,
}

impl ItemTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, returning its key.
    pub fn insert(&mut self, decl: ItemDecl) -> ItemKey {
        let key = ItemKey(self.entries.len());
        self.entries.push(ItemEntry {
            decl,
            state: PlacementState::Available,
        });
        key
    }

    /// Access an entry.
    pub fn entry(&self, key: ItemKey) -> &ItemEntry {
        &self.entries[key.0]
    }

    /// The declaration behind a key.
    pub fn decl(&self, key: ItemKey) -> &ItemDecl {
        &self.entries[key.0].decl
    }

    /// The placement state behind a key.
    pub fn state(&self, key: ItemKey) -> PlacementState {
        self.entries[key.0].state
    }

    /// Mark an item tentatively placed at `node`.
    pub fn set_tentative(&mut self, key: ItemKey, node: NodeId) {
        self.entries[key.0].state = PlacementState::Tentative(node);
    }

    /// Mark an item committed.
    pub fn set_committed(&mut self, key: ItemKey) {
        self.entries[key.0].state = PlacementState::Committed;
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = ItemKey> {
        (0..self.entries.len()).map(ItemKey)
    }

    /// Find a key by item id.
    pub fn key_of(&self, id: &crate::core::types::ItemId) -> Option<ItemKey> {
        self.entries
            .iter()
            .position(|entry| &entry.decl.id == id)
            .map(ItemKey)
    }
}

/// Scope-chained availability tracking.
///
/// Frames form the parent chain: index 0 is the outermost scope, the last
/// frame the scope currently being orchestrated.
#[derive(Debug, Default)]
pub struct MembersRegistry {
    frames: Vec<Vec<ItemKey>>,
}

impl MembersRegistry {
    /// Create a registry with no frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a scope with its available items, in declaration order.
    pub fn enter_scope(&mut self, keys: Vec<ItemKey>) {
        self.frames.push(keys);
    }

    /// Leave the innermost scope.
    ///
    /// Checkout has already mirrored removals upward; the frame is simply
    /// discarded.
    pub fn leave_scope(&mut self) {
        self.frames.pop();
    }

    /// Number of active frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Items still available in the innermost scope, in order.
    pub fn current(&self) -> &[ItemKey] {
        self.frames.last().map_or(&[], Vec::as_slice)
    }

    /// Items visible to the innermost scope: its own frame first, then
    /// ancestor frames outward, preserving declaration order within each.
    pub fn visible(&self) -> Vec<ItemKey> {
        let mut keys = Vec::new();
        for frame in self.frames.iter().rev() {
            keys.extend(frame.iter().copied());
        }
        keys
    }

    /// Whether a frame (0 = outermost) still offers the item.
    pub fn frame_offers(&self, frame: usize, key: ItemKey) -> bool {
        self.frames
            .get(frame)
            .map_or(false, |f| f.contains(&key))
    }

    /// Check an item out: remove it from the current frame and cascade the
    /// removal through every ancestor frame.
    pub fn check_out(&mut self, key: ItemKey) {
        for frame in self.frames.iter_mut().rev() {
            frame.retain(|&k| k != key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ItemId;

    fn table_with(ids: &[&str]) -> (ItemTable, Vec<ItemKey>) {
        let mut table = ItemTable::new();
        let keys = ids
            .iter()
            .map(|id| table.insert(ItemDecl::new(ItemId::new(*id).unwrap(), *id)))
            .collect();
        (table, keys)
    }

    #[test]
    fn items_start_available() {
        let (table, keys) = table_with(&["a"]);
        assert_eq!(table.state(keys[0]), PlacementState::Available);
    }

    #[test]
    fn state_transitions() {
        let (mut table, keys) = table_with(&["a"]);
        table.set_committed(keys[0]);
        assert_eq!(table.state(keys[0]), PlacementState::Committed);
    }

    #[test]
    fn key_lookup_by_id() {
        let (table, keys) = table_with(&["a", "b"]);
        assert_eq!(table.key_of(&ItemId::new("b").unwrap()), Some(keys[1]));
        assert_eq!(table.key_of(&ItemId::new("ghost").unwrap()), None);
    }

    #[test]
    fn checkout_removes_from_current_frame() {
        let (_table, keys) = table_with(&["a", "b"]);
        let mut registry = MembersRegistry::new();
        registry.enter_scope(keys.clone());

        registry.check_out(keys[0]);
        assert_eq!(registry.current(), &[keys[1]]);
    }

    #[test]
    fn checkout_cascades_to_ancestor_frames() {
        let (_table, keys) = table_with(&["a", "b", "c"]);
        let mut registry = MembersRegistry::new();
        registry.enter_scope(keys.clone());
        registry.enter_scope(vec![keys[1]]);

        // Checked out in the child scope...
        registry.check_out(keys[1]);
        registry.leave_scope();

        // ...permanently absent from the parent's available list.
        assert!(!registry.frame_offers(0, keys[1]));
        assert_eq!(registry.current(), &[keys[0], keys[2]]);
    }

    #[test]
    fn visible_lists_inner_frame_first() {
        let (_table, keys) = table_with(&["a", "b", "c"]);
        let mut registry = MembersRegistry::new();
        registry.enter_scope(vec![keys[0], keys[1]]);
        registry.enter_scope(vec![keys[2]]);

        assert_eq!(registry.visible(), vec![keys[2], keys[0], keys[1]]);
    }

    #[test]
    fn leave_scope_discards_frame() {
        let (_table, keys) = table_with(&["a"]);
        let mut registry = MembersRegistry::new();
        registry.enter_scope(keys.clone());
        registry.enter_scope(vec![]);
        assert_eq!(registry.depth(), 2);

        registry.leave_scope();
        assert_eq!(registry.depth(), 1);
        assert_eq!(registry.current(), keys.as_slice());
    }
}
