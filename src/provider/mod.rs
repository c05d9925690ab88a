//! provider
//!
//! External interfaces feeding the composition engine.
//!
//! # Design
//!
//! The engine is polymorphic over anything satisfying these contracts and
//! assumes no particular discovery mechanism; the shipped implementations
//! are the declarative [`manifest`] provider and the scripted [`mock`]
//! provider for tests. All traits are synchronous: a build is one
//! single-threaded call graph with no I/O of its own.
//!
//! Host adapters:
//! - Are queried once per container scope
//! - May fail without corrupting the tree built so far
//! - Never see engine internals beyond the node handed to `render`
//!
//! # Example
//!
//! ```
//! use folio::core::types::ComponentId;
//! use folio::provider::{ItemBatch, ItemSource, ProviderError};
//!
//! struct Empty;
//!
//! impl ItemSource for Empty {
//!     fn items_for(&self, _component: &ComponentId) -> Result<ItemBatch, ProviderError> {
//!         Ok(ItemBatch::default())
//!     }
//! }
//! ```

pub mod manifest;
pub mod mock;

pub use manifest::ManifestProvider;
pub use mock::MockProvider;

use thiserror::Error;

use crate::core::attrs::AttrMap;
use crate::core::node::{DocumentTree, NodeId};
use crate::core::types::{ComponentId, ItemId};

/// Errors from provider operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The requested component is not declared.
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// A declaration was structurally invalid.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// The per-item renderer failed.
    #[error("render failed for item '{item}': {message}")]
    RenderFailed {
        /// The item being rendered.
        item: String,
        /// What went wrong.
        message: String,
    },
}

/// Placement metadata on an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementDirective {
    /// Target section title (bare or hierarchical, matched
    /// case-insensitively).
    pub section: Option<String>,
    /// Item this one must precede.
    pub before: Option<ItemId>,
    /// Item this one must follow.
    pub after: Option<ItemId>,
}

impl PlacementDirective {
    /// Whether the directive carries any ordering constraint.
    pub fn has_ordering(&self) -> bool {
        self.before.is_some() || self.after.is_some()
    }
}

/// One declared content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDecl {
    /// Stable identity within the build.
    pub id: ItemId,
    /// Display name used for node-name derivation.
    pub display_name: String,
    /// Optional placement directive.
    pub directive: Option<PlacementDirective>,
    /// Declared attributes, copied onto the node by the default renderer.
    pub attrs: AttrMap,
    /// Set when the item is itself a container of another component.
    pub content: Option<ComponentId>,
}

impl ItemDecl {
    /// Create a bare item with no directive, attributes or sub-content.
    pub fn new(id: ItemId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            directive: None,
            attrs: AttrMap::new(),
            content: None,
        }
    }

    /// The directive's section target, if any.
    pub fn section_target(&self) -> Option<&str> {
        self.directive.as_ref()?.section.as_deref()
    }
}

/// One declared container section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDecl {
    /// Declared title (unprefixed).
    pub title: String,
    /// Whether the section may receive items lacking a section directive.
    pub accepts_unassigned: bool,
    /// Ignored sections swallow their items without creating nodes.
    pub ignored: bool,
}

impl SectionDecl {
    /// A plain section accepting unassigned items.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            accepts_unassigned: true,
            ignored: false,
        }
    }
}

/// The ordered item list for one scope, plus exclusions.
#[derive(Debug, Clone, Default)]
pub struct ItemBatch {
    /// Items in declaration order.
    pub items: Vec<ItemDecl>,
    /// Item ids to exclude from placement entirely.
    pub ignored: Vec<ItemId>,
}

/// Supplies declared items for a component scope.
pub trait ItemSource {
    /// Ordered items (with directives) and the ignore list for a scope.
    fn items_for(&self, component: &ComponentId) -> Result<ItemBatch, ProviderError>;
}

/// Supplies declared container sections for a component scope.
pub trait SectionSource {
    /// Ordered section descriptors for a scope.
    fn sections_for(&self, component: &ComponentId) -> Result<Vec<SectionDecl>, ProviderError>;
}

/// Fills a committed item's node with its own attributes.
///
/// Invoked by the orchestrator exactly once per committed item.
pub trait Renderer {
    /// Populate `node` for `item`.
    fn render(
        &self,
        item: &ItemDecl,
        tree: &mut DocumentTree,
        node: NodeId,
    ) -> Result<(), ProviderError>;
}

/// The default renderer: copies declared attributes onto the node through
/// the merge policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttrRenderer;

impl Renderer for AttrRenderer {
    fn render(
        &self,
        item: &ItemDecl,
        tree: &mut DocumentTree,
        node: NodeId,
    ) -> Result<(), ProviderError> {
        for (key, value) in &item.attrs {
            tree.set_attr(node, key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_decl_defaults() {
        let item = ItemDecl::new(ItemId::new("title").unwrap(), "Title");
        assert!(item.directive.is_none());
        assert!(item.attrs.is_empty());
        assert!(item.content.is_none());
        assert_eq!(item.section_target(), None);
    }

    #[test]
    fn section_target_reads_directive() {
        let mut item = ItemDecl::new(ItemId::new("title").unwrap(), "Title");
        item.directive = Some(PlacementDirective {
            section: Some("Main".to_string()),
            ..Default::default()
        });
        assert_eq!(item.section_target(), Some("Main"));
    }

    #[test]
    fn directive_ordering_detection() {
        let mut directive = PlacementDirective::default();
        assert!(!directive.has_ordering());
        directive.after = Some(ItemId::new("x").unwrap());
        assert!(directive.has_ordering());
    }

    #[test]
    fn attr_renderer_copies_attributes() {
        let mut item = ItemDecl::new(ItemId::new("title").unwrap(), "Title");
        item.attrs.insert("label".to_string(), "Title".to_string());
        item.attrs.insert("required".to_string(), "true".to_string());

        let mut tree = DocumentTree::new("root");
        let node = tree.add_child(tree.root(), "title", "item");
        AttrRenderer.render(&item, &mut tree, node).unwrap();

        assert_eq!(tree.attr(node, "label"), Some("Title"));
        assert_eq!(tree.attr(node, "required"), Some("true"));
    }
}
