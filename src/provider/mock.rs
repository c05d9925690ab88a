//! provider::mock
//!
//! Scripted in-memory providers for tests.
//!
//! The mock acts as item source, section source and renderer at once, and
//! records every render call so tests can assert the exactly-once
//! contract.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::node::{DocumentTree, NodeId};
use crate::core::types::{ComponentId, ItemId};
use crate::provider::{
    ItemBatch, ItemDecl, ItemSource, ProviderError, Renderer, SectionDecl, SectionSource,
};

#[derive(Debug, Default, Clone)]
struct MockComponent {
    items: Vec<ItemDecl>,
    sections: Vec<SectionDecl>,
    ignored: Vec<ItemId>,
}

/// Scripted provider backed by plain maps.
#[derive(Debug, Default)]
pub struct MockProvider {
    components: HashMap<ComponentId, MockComponent>,
    rendered: RefCell<Vec<ItemId>>,
}

impl MockProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component's items and sections.
    pub fn add_component(
        &mut self,
        component: ComponentId,
        sections: Vec<SectionDecl>,
        items: Vec<ItemDecl>,
    ) {
        self.components.insert(
            component,
            MockComponent {
                items,
                sections,
                ignored: Vec::new(),
            },
        );
    }

    /// Add ids to a component's ignore list.
    pub fn set_ignored(&mut self, component: &ComponentId, ignored: Vec<ItemId>) {
        if let Some(entry) = self.components.get_mut(component) {
            entry.ignored = ignored;
        }
    }

    /// Item ids rendered so far, in call order.
    pub fn rendered(&self) -> Vec<ItemId> {
        self.rendered.borrow().clone()
    }

    /// How many times one item was rendered.
    pub fn render_count(&self, id: &ItemId) -> usize {
        self.rendered.borrow().iter().filter(|r| *r == id).count()
    }

    fn component(&self, component: &ComponentId) -> Result<&MockComponent, ProviderError> {
        self.components
            .get(component)
            .ok_or_else(|| ProviderError::UnknownComponent(component.to_string()))
    }
}

impl ItemSource for MockProvider {
    fn items_for(&self, component: &ComponentId) -> Result<ItemBatch, ProviderError> {
        let entry = self.component(component)?;
        Ok(ItemBatch {
            items: entry.items.clone(),
            ignored: entry.ignored.clone(),
        })
    }
}

impl SectionSource for MockProvider {
    fn sections_for(&self, component: &ComponentId) -> Result<Vec<SectionDecl>, ProviderError> {
        Ok(self.component(component)?.sections.clone())
    }
}

impl Renderer for MockProvider {
    fn render(
        &self,
        item: &ItemDecl,
        tree: &mut DocumentTree,
        node: NodeId,
    ) -> Result<(), ProviderError> {
        self.rendered.borrow_mut().push(item.id.clone());
        for (key, value) in &item.attrs {
            tree.set_attr(node, key, value);
        }
        Ok(())
    }
}
