//! compose
//!
//! Orchestrates the composition lifecycle: Collect -> Place -> Verify.
//!
//! # Architecture
//!
//! The composer is the central coordinator of a build. One build is one
//! synchronous call graph over exclusively owned state: no locking, no
//! suspension points, no I/O.
//!
//! 1. **Collect**: query the item and section sources per scope
//! 2. **Place**: distribute items into the tree (the orchestrator)
//! 3. **Verify**: confirm tree invariants hold and fingerprint the result
//!
//! # Invariants
//!
//! - Every non-ignored item appears in the finished tree exactly once
//! - A child registry frame's checkout is mirrored to its ancestors
//!   before the child scope returns
//! - Every degradation is classified and reported; the build always
//!   produces a valid (possibly degraded) tree under the Continue policy
//!
//! # Example
//!
//! ```
//! use folio::compose::Composer;
//! use folio::core::types::{ComponentId, ItemId};
//! use folio::provider::{ItemDecl, MockProvider};
//!
//! let mut provider = MockProvider::new();
//! let app = ComponentId::new("app").unwrap();
//! provider.add_component(
//!     app.clone(),
//!     vec![],
//!     vec![ItemDecl::new(ItemId::new("title").unwrap(), "Title")],
//! );
//!
//! let composition = Composer::new(&provider, &provider, &provider)
//!     .compose(&app)
//!     .unwrap();
//! assert_eq!(composition.report.items_placed, 1);
//! ```

pub mod collision;
pub mod members;
pub mod place;
pub mod report;
pub mod sections;
pub mod verify;

// Re-exports for convenience
pub use members::{ItemKey, ItemTable, MembersRegistry, PlacementState};
pub use place::{PlaceSettings, Placer, ITEM_KIND, SECTION_KIND};
pub use report::{BuildIssue, BuildReport, ErrorPolicy, IssueId, IssueSink, Severity};
pub use sections::{ScopedSection, SectionsRegistry};
pub use verify::{verify, VerifyError};

use thiserror::Error;

use crate::core::node::DocumentTree;
use crate::core::types::{ComponentId, UtcTimestamp};
use crate::provider::{ItemSource, ProviderError, Renderer, SectionSource};

/// Errors from composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A provider failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The abort policy stopped the build at a degradation.
    #[error("build aborted: {0}")]
    Aborted(BuildIssue),

    /// Post-build verification failed (an engine bug).
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),
}

/// A finished build: the tree plus its report.
#[derive(Debug)]
pub struct Composition {
    /// The composed document tree.
    pub tree: DocumentTree,
    /// Classified conditions, counters and the tree fingerprint.
    pub report: BuildReport,
}

/// The one-shot build coordinator.
pub struct Composer<'a> {
    item_source: &'a dyn ItemSource,
    section_source: &'a dyn SectionSource,
    renderer: &'a dyn Renderer,
    policy: ErrorPolicy,
    settings: PlaceSettings,
}

impl<'a> Composer<'a> {
    /// Create a composer with the Continue policy and default settings.
    pub fn new(
        item_source: &'a dyn ItemSource,
        section_source: &'a dyn SectionSource,
        renderer: &'a dyn Renderer,
    ) -> Self {
        Self {
            item_source,
            section_source,
            renderer,
            policy: ErrorPolicy::Continue,
            settings: PlaceSettings::default(),
        }
    }

    /// Select the error policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override composition settings.
    pub fn with_settings(mut self, settings: PlaceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the document for a root component.
    pub fn compose(&self, root: &ComponentId) -> Result<Composition, ComposeError> {
        let mut tree = DocumentTree::new(root.as_str());

        let placer = Placer::new(
            self.item_source,
            self.section_source,
            self.renderer,
            self.policy,
            self.settings.clone(),
        );
        let (mut items, mut report) = placer.run(root, &mut tree)?;

        // Tentative items that no scope ever claimed keep their fallback
        // node; surface the dangling directive and finalize them.
        let keys: Vec<ItemKey> = items.keys().collect();
        for key in keys {
            if let PlacementState::Tentative(_) = items.state(key) {
                let decl = items.decl(key);
                let section = decl
                    .section_target()
                    .unwrap_or_default()
                    .to_string();
                report.report(BuildIssue::UnclaimedDirective {
                    item: decl.id.to_string(),
                    section,
                });
                items.set_committed(key);
                report.items_placed += 1;
            }
        }

        let fingerprint = verify::verify(&tree, &items)?;
        report.fingerprint = Some(fingerprint);
        report.finished = Some(UtcTimestamp::now());

        Ok(Composition { tree, report })
    }
}
