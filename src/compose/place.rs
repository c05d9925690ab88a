//! compose::place
//!
//! The placement orchestrator.
//!
//! # Architecture
//!
//! One orchestration pass per container scope. The pass queries the
//! section source and item source, enters a registry frame, and
//! distributes items either flat (no sections declared) or across the
//! declared sections, honoring placement directives, ordering
//! constraints, and the claim protocol for tentatively placed items.
//! Container items recurse into child scopes; a component already on the
//! active chain is refused and its container left empty.
//!
//! # Invariants
//!
//! - Every non-ignored item ends up in the tree exactly once
//! - The registry cascade runs before a scope returns
//! - The render callback fires exactly once per item, at node creation
//! - All degradations are classified and reported, never silent

use crate::compose::collision;
use crate::compose::members::{ItemKey, ItemTable, MembersRegistry, PlacementState};
use crate::compose::report::{BuildIssue, BuildReport, ErrorPolicy, IssueSink, Severity};
use crate::compose::sections::SectionsRegistry;
use crate::compose::ComposeError;
use crate::core::config::Config;
use crate::core::naming::slugify;
use crate::core::node::{DocumentTree, NodeId};
use crate::core::order::Orderer;
use crate::core::types::{ComponentId, ItemId};
use crate::provider::{ItemDecl, ItemSource, Renderer, SectionSource};

/// Node kind assigned to item nodes.
pub const ITEM_KIND: &str = "item";

/// Node kind assigned to section nodes.
pub const SECTION_KIND: &str = "section";

/// Composition knobs lifted out of [`Config`].
#[derive(Debug, Clone)]
pub struct PlaceSettings {
    /// Hierarchical title separator.
    pub separator: String,
    /// Title for the synthetic fallback section.
    pub synthetic_title: String,
    /// Maximum generated slug length.
    pub max_slug_len: usize,
}

impl PlaceSettings {
    /// Lift the relevant values from a resolved config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            separator: config.separator().to_string(),
            synthetic_title: config.synthetic_section_title().to_string(),
            max_slug_len: config.max_slug_len(),
        }
    }
}

impl Default for PlaceSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The per-build orchestrator state.
pub struct Placer<'a> {
    item_source: &'a dyn ItemSource,
    section_source: &'a dyn SectionSource,
    renderer: &'a dyn Renderer,
    policy: ErrorPolicy,
    settings: PlaceSettings,
    items: ItemTable,
    registry: MembersRegistry,
    report: BuildReport,
    active: Vec<ComponentId>,
}

impl<'a> Placer<'a> {
    /// Create an orchestrator over the given collaborators.
    pub fn new(
        item_source: &'a dyn ItemSource,
        section_source: &'a dyn SectionSource,
        renderer: &'a dyn Renderer,
        policy: ErrorPolicy,
        settings: PlaceSettings,
    ) -> Self {
        Self {
            item_source,
            section_source,
            renderer,
            policy,
            settings,
            items: ItemTable::new(),
            registry: MembersRegistry::new(),
            report: BuildReport::new(),
            active: Vec::new(),
        }
    }

    /// Run the top-level scope and consume the orchestrator.
    ///
    /// Returns the item table and the report; the tree is populated in
    /// place.
    pub fn run(
        mut self,
        root: &ComponentId,
        tree: &mut DocumentTree,
    ) -> Result<(ItemTable, BuildReport), ComposeError> {
        let root_node = tree.root();
        self.active.push(root.clone());
        self.place_scope(root, tree, root_node, &[], None)?;
        self.active.pop();
        Ok((self.items, self.report))
    }

    /// Classify a condition; abort when the policy demands it.
    fn raise(&mut self, issue: BuildIssue) -> Result<(), ComposeError> {
        let abort = self.policy == ErrorPolicy::Abort && issue.severity() == Severity::Warning;
        self.report.report(issue.clone());
        if abort {
            Err(ComposeError::Aborted(issue))
        } else {
            Ok(())
        }
    }

    /// One orchestration pass for a component scope.
    fn place_scope(
        &mut self,
        component: &ComponentId,
        tree: &mut DocumentTree,
        target: NodeId,
        enclosing: &[String],
        owner: Option<&ItemId>,
    ) -> Result<(), ComposeError> {
        let declared = self.section_source.sections_for(component)?;
        let sections = SectionsRegistry::for_scope(declared, enclosing, &self.settings.separator);

        let batch = self.item_source.items_for(component)?;
        let keys: Vec<ItemKey> = batch
            .items
            .into_iter()
            .filter(|item| !batch.ignored.contains(&item.id))
            .map(|decl| self.items.insert(decl))
            .collect();
        self.registry.enter_scope(keys);

        let result = if sections.is_empty() {
            self.flat_placement(tree, target, enclosing)
        } else {
            self.sectioned_placement(component, tree, target, &sections, enclosing, owner)
        };

        self.registry.leave_scope();
        result
    }

    // =========================================================================
    // Flat placement (no sections declared)
    // =========================================================================

    fn flat_placement(
        &mut self,
        tree: &mut DocumentTree,
        target: NodeId,
        enclosing: &[String],
    ) -> Result<(), ComposeError> {
        let batch = self.registry.current().to_vec();
        let ordered = self.resolve_batch(&batch)?;

        for key in ordered {
            // A nested scope may have claimed the item meanwhile.
            if !self.registry.current().contains(&key) {
                continue;
            }
            if self.items.state(key) == PlacementState::Committed {
                continue;
            }

            let decl = self.items.decl(key).clone();
            let node = self.create_item_node(tree, target, &decl);
            self.renderer
                .render(&decl, tree, node)
                .map_err(ComposeError::Provider)?;

            if decl.section_target().is_some() {
                // The directive cannot resolve in a sectionless scope: keep
                // the node as a claimable fallback.
                self.items.set_tentative(key, node);
            } else {
                self.commit(key);
            }

            self.maybe_recurse(&decl, tree, node, enclosing)?;
        }
        Ok(())
    }

    // =========================================================================
    // Multi-section placement
    // =========================================================================

    fn sectioned_placement(
        &mut self,
        component: &ComponentId,
        tree: &mut DocumentTree,
        target: NodeId,
        sections: &SectionsRegistry,
        enclosing: &[String],
        owner: Option<&ItemId>,
    ) -> Result<(), ComposeError> {
        let default_idx = sections.default_section();
        let mut section_nodes: Vec<Option<NodeId>> = vec![None; sections.len()];

        for idx in 0..sections.len() {
            let gathered = self.gather_for_section(sections, idx, default_idx);
            let ordered = self.resolve_batch(&gathered)?;
            let section = sections.get(idx).clone();

            if section.decl.ignored {
                // Checked out without nodes: these items are dropped.
                for key in ordered {
                    if self.items.state(key) == PlacementState::Committed {
                        continue;
                    }
                    if let PlacementState::Tentative(node) = self.items.state(key) {
                        tree.remove_node(node);
                    }
                    self.items.set_committed(key);
                    self.registry.check_out(key);
                }
                continue;
            }

            let section_node = self.create_section_node(tree, target, &section.decl.title);
            section_nodes[idx] = Some(section_node);

            let mut child_enclosing = enclosing.to_vec();
            child_enclosing.push(section.decl.title.clone());

            for key in ordered {
                self.place_into_section(key, tree, section_node, &child_enclosing, owner, component)?;
            }
        }

        self.place_overflow(component, tree, target, sections, default_idx, &section_nodes, enclosing)
    }

    /// Items bound to the section by directive (from every visible frame),
    /// plus - for the default section - the current frame's unassigned
    /// items.
    fn gather_for_section(
        &self,
        sections: &SectionsRegistry,
        idx: usize,
        default_idx: Option<usize>,
    ) -> Vec<ItemKey> {
        let mut gathered: Vec<ItemKey> = Vec::new();

        for key in self.registry.visible() {
            if self.items.state(key) == PlacementState::Committed {
                continue;
            }
            let Some(target) = self.items.decl(key).section_target() else {
                continue;
            };
            if sections.matches(idx, target) && !gathered.contains(&key) {
                gathered.push(key);
            }
        }

        if Some(idx) == default_idx {
            for key in self.registry.current().to_vec() {
                if self.items.state(key) == PlacementState::Committed {
                    continue;
                }
                if self.items.decl(key).section_target().is_none() && !gathered.contains(&key) {
                    gathered.push(key);
                }
            }
        }

        gathered
    }

    fn place_into_section(
        &mut self,
        key: ItemKey,
        tree: &mut DocumentTree,
        section_node: NodeId,
        child_enclosing: &[String],
        owner: Option<&ItemId>,
        component: &ComponentId,
    ) -> Result<(), ComposeError> {
        match self.items.state(key) {
            PlacementState::Committed => Ok(()),
            PlacementState::Tentative(existing) => {
                // Claim: relocate the fallback node, unless that would
                // close a containment cycle.
                if collision::would_cycle(tree, existing, section_node) {
                    let item = self.items.decl(key).id.to_string();
                    let other = owner
                        .map(ToString::to_string)
                        .unwrap_or_else(|| component.to_string());
                    self.raise(BuildIssue::CircularPlacement { item, other })?;
                } else {
                    tree.move_node(existing, section_node);
                }
                // Either way the item is final now; content was already
                // rendered and recursed at tentative placement.
                self.commit(key);
                Ok(())
            }
            PlacementState::Available => {
                let decl = self.items.decl(key).clone();
                let node = self.create_item_node(tree, section_node, &decl);
                self.renderer
                    .render(&decl, tree, node)
                    .map_err(ComposeError::Provider)?;
                self.commit(key);
                self.maybe_recurse(&decl, tree, node, child_enclosing)
            }
        }
    }

    /// Place whatever the declared sections left behind: items whose
    /// directive matched nothing here, and - when no default section was
    /// usable - unassigned items (the structural-error fallback).
    fn place_overflow(
        &mut self,
        component: &ComponentId,
        tree: &mut DocumentTree,
        target: NodeId,
        sections: &SectionsRegistry,
        default_idx: Option<usize>,
        section_nodes: &[Option<NodeId>],
        enclosing: &[String],
    ) -> Result<(), ComposeError> {
        let leftovers: Vec<ItemKey> = self
            .registry
            .current()
            .iter()
            .copied()
            .filter(|&key| self.items.state(key) == PlacementState::Available)
            .collect();
        if leftovers.is_empty() {
            return Ok(());
        }

        let (overflow_node, overflow_title) = match default_idx.map(|i| (i, section_nodes[i])) {
            Some((idx, Some(node))) => (node, sections.get(idx).decl.title.clone()),
            _ => {
                let title = self.settings.synthetic_title.clone();
                self.raise(BuildIssue::StructuralFallback {
                    component: component.to_string(),
                    title: title.clone(),
                })?;
                let node = self.create_section_node(tree, target, &title);
                (node, title)
            }
        };

        let ordered = self.resolve_batch(&leftovers)?;
        let mut child_enclosing = enclosing.to_vec();
        child_enclosing.push(overflow_title);

        for key in ordered {
            if self.items.state(key) == PlacementState::Committed {
                continue;
            }
            let decl = self.items.decl(key).clone();
            let node = self.create_item_node(tree, overflow_node, &decl);
            self.renderer
                .render(&decl, tree, node)
                .map_err(ComposeError::Provider)?;

            if decl.section_target().is_some() {
                // Unmatched directive: fallback rendering, still claimable.
                self.items.set_tentative(key, node);
            } else {
                self.commit(key);
            }

            self.maybe_recurse(&decl, tree, node, &child_enclosing)?;
        }
        Ok(())
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Order a batch by its before/after directives. Targets outside the
    /// batch carry no edge; dropped cycle edges are reported.
    fn resolve_batch(&mut self, keys: &[ItemKey]) -> Result<Vec<ItemKey>, ComposeError> {
        let mut orderer = Orderer::new(keys.len());
        for (index, &key) in keys.iter().enumerate() {
            let Some(directive) = self.items.decl(key).directive.clone() else {
                continue;
            };
            if let Some(ref target) = directive.before {
                if let Some(other) = self.position_of(keys, target) {
                    orderer.declare_before(index, other);
                }
            }
            if let Some(ref target) = directive.after {
                if let Some(other) = self.position_of(keys, target) {
                    orderer.declare_after(index, other);
                }
            }
        }

        let resolution = orderer.resolve();
        for edge in &resolution.dropped {
            let earlier = self.items.decl(keys[edge.earlier]).id.to_string();
            let later = self.items.decl(keys[edge.later]).id.to_string();
            self.raise(BuildIssue::OrderingRelaxed { earlier, later })?;
        }

        Ok(resolution.order.into_iter().map(|i| keys[i]).collect())
    }

    fn position_of(&self, keys: &[ItemKey], target: &ItemId) -> Option<usize> {
        keys.iter()
            .position(|&key| &self.items.decl(key).id == target)
    }

    fn create_item_node(
        &mut self,
        tree: &mut DocumentTree,
        parent: NodeId,
        decl: &ItemDecl,
    ) -> NodeId {
        let desired = slugify(&decl.display_name, self.settings.max_slug_len);
        collision::create_child_reporting(tree, parent, &desired, ITEM_KIND, &mut self.report)
    }

    fn create_section_node(
        &mut self,
        tree: &mut DocumentTree,
        parent: NodeId,
        title: &str,
    ) -> NodeId {
        let desired = slugify(title, self.settings.max_slug_len);
        let node =
            collision::create_child_reporting(tree, parent, &desired, SECTION_KIND, &mut self.report);
        tree.set_attr(node, "title", title);
        node
    }

    fn commit(&mut self, key: ItemKey) {
        self.items.set_committed(key);
        self.registry.check_out(key);
        self.report.items_placed += 1;
    }

    fn maybe_recurse(
        &mut self,
        decl: &ItemDecl,
        tree: &mut DocumentTree,
        node: NodeId,
        enclosing: &[String],
    ) -> Result<(), ComposeError> {
        let Some(content) = decl.content.clone() else {
            return Ok(());
        };

        if self.active.contains(&content) {
            // Infinite expansion: emit the container empty and move on.
            return self.raise(BuildIssue::RecursiveContainer {
                item: decl.id.to_string(),
                component: content.to_string(),
            });
        }

        self.active.push(content.clone());
        let result = self.place_scope(&content, tree, node, enclosing, Some(&decl.id));
        self.active.pop();
        result
    }
}
