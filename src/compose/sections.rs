//! compose::sections
//!
//! The per-scope sections registry.
//!
//! # Architecture
//!
//! Built once per scope from the declared section descriptors and
//! immutable for that scope's orchestration. Each section's title is
//! prefixed with the titles of the enclosing section-bearing containers,
//! joined by the configured separator, so a directive can unambiguously
//! target `"Outer/Inner"` from anywhere in the build. Matching is
//! case-insensitive and accepts either the composed path or the bare
//! declared title.

use crate::provider::SectionDecl;

/// One declared section with its composed title.
#[derive(Debug, Clone)]
pub struct ScopedSection {
    /// The declaration as supplied by the section source.
    pub decl: SectionDecl,
    /// Hierarchical title: enclosing titles + own, separator-joined.
    pub title_path: String,
}

/// The immutable section list for one scope.
#[derive(Debug, Clone, Default)]
pub struct SectionsRegistry {
    sections: Vec<ScopedSection>,
}

impl SectionsRegistry {
    /// Build the registry for a scope.
    ///
    /// `enclosing` holds the titles of the section chain above this scope,
    /// outermost first.
    pub fn for_scope(declared: Vec<SectionDecl>, enclosing: &[String], separator: &str) -> Self {
        let sections = declared
            .into_iter()
            .map(|decl| {
                let title_path = if enclosing.is_empty() {
                    decl.title.clone()
                } else {
                    let mut parts: Vec<&str> = enclosing.iter().map(String::as_str).collect();
                    parts.push(&decl.title);
                    parts.join(separator)
                };
                ScopedSection { decl, title_path }
            })
            .collect();
        Self { sections }
    }

    /// Whether the scope declared no sections (flat placement).
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of declared sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Sections in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &ScopedSection> {
        self.sections.iter()
    }

    /// One section by declared position.
    pub fn get(&self, index: usize) -> &ScopedSection {
        &self.sections[index]
    }

    /// The default/overflow section: the first non-ignored section that
    /// accepts unassigned items.
    pub fn default_section(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| !s.decl.ignored && s.decl.accepts_unassigned)
    }

    /// Whether `target` names the section at `index`.
    ///
    /// Accepts the composed title path or the bare declared title,
    /// case-insensitively.
    pub fn matches(&self, index: usize, target: &str) -> bool {
        let section = &self.sections[index];
        target.eq_ignore_ascii_case(&section.title_path)
            || target.eq_ignore_ascii_case(&section.decl.title)
    }

    /// The first section (declared order) matched by `target`.
    pub fn find_match(&self, target: &str) -> Option<usize> {
        (0..self.sections.len()).find(|&index| self.matches(index, target))
    }
}
