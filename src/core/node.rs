//! core::node
//!
//! The document tree: named, attributed, ordered nodes with path-based
//! navigation.
//!
//! # Architecture
//!
//! All nodes of one document live in a [`DocumentTree`] arena and are
//! addressed by [`NodeId`] handles. The owning relation is strictly
//! parent-to-children (ordered); the parent back-reference exists only for
//! upward queries (`parent`, `..` resolution, prefix composition).
//!
//! # Invariants
//!
//! - Sibling names are unique; colliding inserts get a numeric suffix
//! - The tree is acyclic and finite; relocation refuses descendant targets
//! - Every node carries the implicit `kind` attribute from creation
//!
//! # Example
//!
//! ```
//! use folio::core::node::DocumentTree;
//!
//! let mut tree = DocumentTree::new("form");
//! let root = tree.root();
//!
//! let c = tree.get_or_create_target(root, "a/b/c");
//! assert_eq!(tree.get_target(root, "a/b/c"), Some(c));
//! assert_eq!(tree.get_target(root, "a/missing"), None);
//!
//! tree.set_attr(c, "label", "Charlie");
//! assert_eq!(tree.attr(c, "label"), Some("Charlie"));
//! ```

use crate::core::attrs::{merge_value, AttrMap, KIND_KEY};
use crate::core::naming::uniquify;
use crate::core::path::{self, Segment};
use crate::core::types::NodeName;

/// Default value of the implicit `kind` attribute.
pub const DEFAULT_KIND: &str = "node";

/// Handle to one node inside a [`DocumentTree`].
///
/// Ids stay valid until the node is removed; using a removed node's id is
/// a logic error and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeData {
    name: NodeName,
    attrs: AttrMap,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    prefix: String,
    postfix: String,
}

impl NodeData {
    fn new(name: NodeName, kind: &str, parent: Option<NodeId>) -> Self {
        let mut attrs = AttrMap::new();
        attrs.insert(KIND_KEY.to_string(), kind.to_string());
        Self {
            name,
            attrs,
            children: Vec::new(),
            parent,
            prefix: String::new(),
            postfix: String::new(),
        }
    }
}

/// An arena-backed document tree.
#[derive(Debug)]
pub struct DocumentTree {
    slots: Vec<Option<NodeData>>,
    root: NodeId,
}

impl DocumentTree {
    /// Create a tree with a root node of the given name and default kind.
    ///
    /// Root names come from trusted callers (component ids and config),
    /// so an invalid name falls back to `"document"`.
    pub fn new(root_name: &str) -> Self {
        let name =
            NodeName::new(root_name).unwrap_or_else(|_| NodeName::new("document").expect("valid"));
        Self {
            slots: vec![Some(NodeData::new(name, DEFAULT_KIND, None))],
            root: NodeId(0),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn data(&self, id: NodeId) -> &NodeData {
        self.slots[id.0].as_ref().expect("node id is stale")
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.slots[id.0].as_mut().expect("node id is stale")
    }

    /// Whether the id still refers to a live node.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.slots.get(id.0).map_or(false, Option::is_some)
    }

    /// The node's own name.
    pub fn name(&self, id: NodeId) -> &NodeName {
        &self.data(id).name
    }

    /// The node's parent, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// The node's children, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// The node's attributes, in insertion order.
    pub fn attrs(&self, id: NodeId) -> &AttrMap {
        &self.data(id).attrs
    }

    /// One attribute value.
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.data(id).attrs.get(key).map(String::as_str)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Write an attribute through the merge policy: scalars replace unless
    /// the new value is blank, set-encoded values union.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        let merged = merge_value(self.attr(id, key), value);
        self.data_mut(id).attrs.insert(key.to_string(), merged);
    }

    /// Add a child, uniquifying the desired name against existing siblings.
    ///
    /// Returns the new node's id. The actual name may carry a numeric
    /// suffix; read it back with [`DocumentTree::name`].
    pub fn add_child(&mut self, parent: NodeId, desired: &str, kind: &str) -> NodeId {
        let unique = uniquify(desired, |candidate| {
            self.child_by_name(parent, candidate).is_some()
        });
        let name =
            NodeName::new(unique).unwrap_or_else(|_| NodeName::new("node").expect("valid"));

        let id = NodeId(self.slots.len());
        self.slots.push(Some(NodeData::new(name, kind, Some(parent))));
        self.data_mut(parent).children.push(id);
        id
    }

    /// Find a direct child by exact name.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.data(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.data(child).name.as_str() == name)
    }

    /// Detach a node from its parent and free its whole subtree.
    ///
    /// The root cannot be removed; the call is a no-op returning `false`.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.data(id).parent else {
            return false;
        };
        self.data_mut(parent).children.retain(|&c| c != id);

        for freed in self.descendants(id) {
            self.slots[freed.0] = None;
        }
        self.slots[id.0] = None;
        true
    }

    /// Relocate a node (with its subtree) under a new parent, appended at
    /// the end of the new sibling list.
    ///
    /// Refuses to move the root, to move a node under itself, or under one
    /// of its own descendants (the tree stays acyclic). Returns `false`
    /// when refused. On a sibling-name collision the node is renamed with
    /// a numeric suffix.
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId) -> bool {
        if id == new_parent || self.is_ancestor_of(id, new_parent) {
            return false;
        }
        let Some(old_parent) = self.data(id).parent else {
            return false;
        };
        if old_parent == new_parent {
            return true;
        }

        self.data_mut(old_parent).children.retain(|&c| c != id);

        let unique = uniquify(self.data(id).name.as_str(), |candidate| {
            self.child_by_name(new_parent, candidate).is_some()
        });
        let name =
            NodeName::new(unique).unwrap_or_else(|_| NodeName::new("node").expect("valid"));
        {
            let data = self.data_mut(id);
            data.name = name;
            data.parent = Some(new_parent);
        }
        self.data_mut(new_parent).children.push(id);
        true
    }

    /// Whether `ancestor` lies on `node`'s parent chain (strictly above).
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.data(node).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.data(id).parent;
        }
        false
    }

    // =========================================================================
    // Path resolution
    // =========================================================================

    fn step(&self, current: NodeId, segment: &Segment) -> Option<NodeId> {
        match segment {
            Segment::Current => Some(current),
            // `..` at the root resolves to the root itself.
            Segment::Parent => Some(self.data(current).parent.unwrap_or(current)),
            Segment::Named(name) => self.child_by_name(current, name),
        }
    }

    /// Non-creating lookup. Returns `None` if any segment is missing.
    pub fn get_target(&self, start: NodeId, path: &str) -> Option<NodeId> {
        let mut current = start;
        for segment in path::split(path) {
            current = self.step(current, &segment)?;
        }
        Some(current)
    }

    /// Lookup that creates missing segments with the default kind.
    pub fn get_or_create_target(&mut self, start: NodeId, path: &str) -> NodeId {
        let mut current = start;
        for segment in path::split(path) {
            current = match self.step(current, &segment) {
                Some(next) => next,
                None => match &segment {
                    Segment::Named(name) => self.add_child(current, name, DEFAULT_KIND),
                    // Current/Parent always resolve.
                    _ => current,
                },
            };
        }
        current
    }

    /// Create a fresh node at the path, replacing any existing node of the
    /// final segment's exact name. Intermediate segments are created as
    /// needed; a final `.`/`..` segment only navigates.
    pub fn create_target(&mut self, start: NodeId, path: &str) -> NodeId {
        let segments = path::split(path);
        let Some((last, init)) = segments.split_last() else {
            return start;
        };

        let mut current = start;
        for segment in init {
            current = match self.step(current, segment) {
                Some(next) => next,
                None => match segment {
                    Segment::Named(name) => self.add_child(current, name, DEFAULT_KIND),
                    _ => current,
                },
            };
        }

        match last {
            Segment::Named(name) => {
                if let Some(existing) = self.child_by_name(current, name) {
                    self.remove_node(existing);
                }
                self.add_child(current, name, DEFAULT_KIND)
            }
            _ => self.step(current, last).unwrap_or(current),
        }
    }

    /// Remove the node at the path. Returns `false` when the path does not
    /// resolve or resolves to the root.
    pub fn remove_target(&mut self, start: NodeId, path: &str) -> bool {
        match self.get_target(start, path) {
            Some(id) => self.remove_node(id),
            None => false,
        }
    }

    // =========================================================================
    // Name prefix / postfix
    // =========================================================================

    /// Set the node's own name prefix fragment.
    pub fn set_prefix(&mut self, id: NodeId, prefix: &str) {
        self.data_mut(id).prefix = prefix.to_string();
    }

    /// Set the node's own name postfix fragment.
    pub fn set_postfix(&mut self, id: NodeId, postfix: &str) {
        self.data_mut(id).postfix = postfix.to_string();
    }

    fn chain_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = self.data(id).parent;
        while let Some(node) = current {
            chain.push(node);
            current = self.data(node).parent;
        }
        chain
    }

    /// Compose the name prefix: ancestors' fragments outer-to-inner,
    /// ending with the node's own.
    pub fn name_prefix(&self, id: NodeId) -> String {
        self.chain_to_root(id)
            .iter()
            .rev()
            .map(|&n| self.data(n).prefix.as_str())
            .collect()
    }

    /// Compose the name postfix: the node's own fragment first, then
    /// ancestors' inner-to-outer.
    pub fn name_postfix(&self, id: NodeId) -> String {
        self.chain_to_root(id)
            .iter()
            .map(|&n| self.data(n).postfix.as_str())
            .collect()
    }

    /// The node's display name: composed prefix + name + composed postfix.
    pub fn composed_name(&self, id: NodeId) -> String {
        format!(
            "{}{}{}",
            self.name_prefix(id),
            self.data(id).name.as_str(),
            self.name_postfix(id)
        )
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the node has no children and only the implicit attribute.
    pub fn is_empty_node(&self, id: NodeId) -> bool {
        let data = self.data(id);
        data.children.is_empty() && data.attrs.len() == 1 && data.attrs.contains_key(KIND_KEY)
    }

    /// All nodes strictly below `id`, preorder.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.data(id).children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.data(current).children.iter().rev().copied());
        }
        result
    }

    /// The path string from the root to this node, quoting names that
    /// contain separators.
    pub fn path_of(&self, id: NodeId) -> String {
        let names: Vec<&str> = self
            .chain_to_root(id)
            .iter()
            .rev()
            .skip(1) // the root is the path's origin, not a segment
            .map(|&n| self.data(n).name.as_str())
            .collect();
        path::join(names)
    }
}
