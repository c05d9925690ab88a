//! compose::report
//!
//! Classified build conditions and the report channel.
//!
//! # Architecture
//!
//! Every recoverable condition the orchestrator meets is classified as a
//! [`BuildIssue`] and handed to the build's issue sink. The engine never
//! retries and never silently drops a classification, but it always
//! produces some valid (possibly degraded) tree; whether a condition
//! aborts the build is the caller's choice via [`ErrorPolicy`].

use thiserror::Error;
use uuid::Uuid;

use crate::core::types::{Fingerprint, UtcTimestamp};

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Diagnostic only; auto-resolved conditions.
    Info,
    /// Degraded output; the tree is valid but not what was asked for.
    Warning,
}

/// A stable, deterministic issue identifier.
///
/// Ids allow callers to match conditions across runs without parsing
/// messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueId(String);

impl IssueId {
    /// An id for a class of issue keyed by a subject.
    pub fn new(kind: &str, key: &str) -> Self {
        Self(format!("{kind}:{key}"))
    }

    /// An id for a unique, unkeyed issue class.
    pub fn singleton(kind: &str) -> Self {
        Self(kind.to_string())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classified conditions raised during composition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildIssue {
    /// A sectioned scope had unassigned items but no usable default
    /// section; a synthetic empty section was substituted.
    #[error("component '{component}' has no usable default section; substituted '{title}'")]
    StructuralFallback {
        /// The component whose scope degraded.
        component: String,
        /// Title of the substituted section.
        title: String,
    },

    /// Sibling name collision, auto-resolved with a numeric suffix.
    #[error("name '{requested}' under '{parent}' taken; assigned '{assigned}'")]
    NameCollision {
        /// Path of the parent node.
        parent: String,
        /// The requested child name.
        requested: String,
        /// The unique name actually assigned.
        assigned: String,
    },

    /// A mutual/circular nesting request was refused; the item keeps its
    /// fallback placement.
    #[error("circular placement between '{item}' and '{other}'; relocation refused")]
    CircularPlacement {
        /// The item whose relocation was refused.
        item: String,
        /// The item on the other side of the cycle.
        other: String,
    },

    /// A container item would re-enter a component already being
    /// processed; an empty container was emitted instead.
    #[error("container '{item}' re-enters component '{component}'; emitted empty")]
    RecursiveContainer {
        /// The offending container item.
        item: String,
        /// The component that would recurse.
        component: String,
    },

    /// A before/after edge closed a cycle and was relaxed.
    #[error("ordering between '{earlier}' and '{later}' relaxed (cycle)")]
    OrderingRelaxed {
        /// The declared earlier item.
        earlier: String,
        /// The declared later item.
        later: String,
    },

    /// An item's section directive never matched a declared section; the
    /// item stayed at its flat fallback placement.
    #[error("item '{item}' targets unknown section '{section}'; kept fallback placement")]
    UnclaimedDirective {
        /// The item with the dangling directive.
        item: String,
        /// The section name that never resolved.
        section: String,
    },
}

impl BuildIssue {
    /// Generate a stable issue id for this condition.
    pub fn issue_id(&self) -> IssueId {
        match self {
            BuildIssue::StructuralFallback { component, .. } => {
                IssueId::new("structural-fallback", component)
            }
            BuildIssue::NameCollision {
                parent, requested, ..
            } => IssueId::new("name-collision", &format!("{parent}/{requested}")),
            BuildIssue::CircularPlacement { item, other } => {
                IssueId::new("circular-placement", &format!("{item}<->{other}"))
            }
            BuildIssue::RecursiveContainer { component, .. } => {
                IssueId::new("recursive-container", component)
            }
            BuildIssue::OrderingRelaxed { earlier, later } => {
                IssueId::new("ordering-relaxed", &format!("{earlier}->{later}"))
            }
            BuildIssue::UnclaimedDirective { item, .. } => {
                IssueId::new("unclaimed-directive", item)
            }
        }
    }

    /// Get the severity of this condition.
    pub fn severity(&self) -> Severity {
        match self {
            BuildIssue::StructuralFallback { .. } => Severity::Warning,
            BuildIssue::NameCollision { .. } => Severity::Info,
            BuildIssue::CircularPlacement { .. } => Severity::Warning,
            BuildIssue::RecursiveContainer { .. } => Severity::Warning,
            BuildIssue::OrderingRelaxed { .. } => Severity::Info,
            BuildIssue::UnclaimedDirective { .. } => Severity::Info,
        }
    }
}

/// What the caller wants done with warning-severity conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Record every condition and keep building (default).
    #[default]
    Continue,
    /// Stop at the first warning-severity condition.
    Abort,
}

/// The caller's error channel.
///
/// [`BuildReport`] is the standard collecting sink; callers wanting live
/// streaming can wrap their own.
pub trait IssueSink {
    /// Receive one classified condition.
    fn report(&mut self, issue: BuildIssue);
}

/// Collected outcome of one composition run.
#[derive(Debug)]
pub struct BuildReport {
    /// Unique id of this build.
    pub build_id: Uuid,
    /// When the build started.
    pub started: UtcTimestamp,
    /// When the build finished (set by the composer).
    pub finished: Option<UtcTimestamp>,
    /// All conditions, in the order they were raised.
    pub issues: Vec<BuildIssue>,
    /// Number of items committed into the tree.
    pub items_placed: usize,
    /// Fingerprint of the finished tree (set by the verify pass).
    pub fingerprint: Option<Fingerprint>,
}

impl BuildReport {
    /// Start a fresh report.
    pub fn new() -> Self {
        Self {
            build_id: Uuid::new_v4(),
            started: UtcTimestamp::now(),
            finished: None,
            issues: Vec::new(),
            items_placed: 0,
            fingerprint: None,
        }
    }

    /// Issues at warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &BuildIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
    }

    /// Whether any warning-severity condition was recorded.
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// One-line summary for user-facing output.
    pub fn summary(&self) -> String {
        let warnings = self.warnings().count();
        let infos = self.issues.len() - warnings;
        format!(
            "{} item(s) placed, {} warning(s), {} note(s)",
            self.items_placed, warnings, infos
        )
    }
}

impl Default for BuildReport {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueSink for BuildReport {
    fn report(&mut self, issue: BuildIssue) {
        self.issues.push(issue);
    }
}
