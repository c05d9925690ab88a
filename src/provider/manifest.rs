//! provider::manifest
//!
//! The declarative component manifest (v1) and the providers over it.
//!
//! # Schema Design
//!
//! Manifests are:
//! - Self-describing with `kind` and `schema_version`
//! - Strictly parsed (unknown fields rejected)
//! - Accepted as TOML or JSON (detected from the document shape)
//!
//! # Example
//!
//! ```
//! use folio::provider::manifest::{parse_manifest, ManifestProvider};
//!
//! let text = r#"
//! kind = "folio.manifest"
//! schema_version = 1
//! root = "app"
//!
//! [component.app]
//!
//! [[component.app.sections]]
//! title = "General"
//!
//! [[component.app.fields]]
//! id = "title"
//! name = "Title"
//! section = "General"
//! "#;
//!
//! let manifest = parse_manifest(text).unwrap();
//! let provider = ManifestProvider::new(manifest).unwrap();
//! assert_eq!(provider.root().as_str(), "app");
//! ```

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{ComponentId, ItemId, TypeError};
use crate::provider::{
    ItemBatch, ItemDecl, ItemSource, PlacementDirective, ProviderError, SectionDecl, SectionSource,
};

/// The kind identifier for manifests.
pub const MANIFEST_KIND: &str = "folio.manifest";

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    ParseError(String),

    #[error("invalid kind '{found}', expected '{MANIFEST_KIND}'")]
    InvalidKind { found: String },

    #[error("unsupported schema version {0}, supported: {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),

    #[error("root component '{0}' is not declared")]
    UnknownRoot(String),

    #[error("type validation failed: {0}")]
    TypeError(#[from] TypeError),
}

/// Envelope for version dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct ManifestEnvelope {
    kind: String,
    schema_version: u32,
}

/// One declared section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionEntry {
    /// Section title.
    pub title: String,
    /// Whether the section accepts items without a section directive.
    #[serde(default = "default_true")]
    pub accepts_unassigned: bool,
    /// Ignored sections swallow their items.
    #[serde(default)]
    pub ignored: bool,
}

/// One declared field (content item).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    /// Stable field id.
    pub id: String,
    /// Display name; defaults to the id.
    #[serde(default)]
    pub name: Option<String>,
    /// Target section title.
    #[serde(default)]
    pub section: Option<String>,
    /// Field this one must precede.
    #[serde(default)]
    pub before: Option<String>,
    /// Field this one must follow.
    #[serde(default)]
    pub after: Option<String>,
    /// Component this field expands into.
    #[serde(default)]
    pub content: Option<String>,
    /// Attributes copied onto the node.
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
}

/// One declared component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentEntry {
    /// Sections in declared order.
    #[serde(default)]
    pub sections: Vec<SectionEntry>,
    /// Fields in declared order.
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    /// Field ids excluded from placement.
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// Manifest schema v1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestV1 {
    /// Must be [`MANIFEST_KIND`].
    pub kind: String,
    /// Must be [`SCHEMA_VERSION`].
    pub schema_version: u32,
    /// The root component id.
    pub root: String,
    /// Declared components by id.
    #[serde(default)]
    pub component: IndexMap<String, ComponentEntry>,
}

fn default_true() -> bool {
    true
}

/// Parse a manifest with version dispatch.
///
/// JSON documents start with `{`; anything else parses as TOML.
pub fn parse_manifest(text: &str) -> Result<ManifestV1, ManifestError> {
    let is_json = text.trim_start().starts_with('{');

    let envelope: ManifestEnvelope = if is_json {
        serde_json::from_str(text).map_err(|e| ManifestError::ParseError(e.to_string()))?
    } else {
        toml::from_str(text).map_err(|e| ManifestError::ParseError(e.to_string()))?
    };
    if envelope.kind != MANIFEST_KIND {
        return Err(ManifestError::InvalidKind {
            found: envelope.kind,
        });
    }
    if envelope.schema_version != SCHEMA_VERSION {
        return Err(ManifestError::UnsupportedVersion(envelope.schema_version));
    }

    if is_json {
        serde_json::from_str(text).map_err(|e| ManifestError::ParseError(e.to_string()))
    } else {
        toml::from_str(text).map_err(|e| ManifestError::ParseError(e.to_string()))
    }
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<ManifestV1, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&text)
}

#[derive(Debug, Clone)]
struct CompiledComponent {
    items: Vec<ItemDecl>,
    sections: Vec<SectionDecl>,
    ignored: Vec<ItemId>,
}

/// Item and section source over a validated manifest.
#[derive(Debug)]
pub struct ManifestProvider {
    root: ComponentId,
    components: HashMap<ComponentId, CompiledComponent>,
}

impl ManifestProvider {
    /// Validate a parsed manifest into a provider.
    ///
    /// All ids are validated here, so the sources themselves cannot fail
    /// on malformed declarations later.
    pub fn new(manifest: ManifestV1) -> Result<Self, ManifestError> {
        let root = ComponentId::new(manifest.root.clone())?;
        if !manifest.component.contains_key(&manifest.root) {
            return Err(ManifestError::UnknownRoot(manifest.root));
        }

        let mut components = HashMap::new();
        for (name, entry) in manifest.component {
            let id = ComponentId::new(name)?;
            components.insert(id, compile_component(entry)?);
        }

        Ok(Self { root, components })
    }

    /// Load, parse and validate a manifest file in one step.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        Self::new(load_manifest(path)?)
    }

    /// The declared root component.
    pub fn root(&self) -> &ComponentId {
        &self.root
    }
}

fn compile_component(entry: ComponentEntry) -> Result<CompiledComponent, ManifestError> {
    let sections = entry
        .sections
        .into_iter()
        .map(|s| SectionDecl {
            title: s.title,
            accepts_unassigned: s.accepts_unassigned,
            ignored: s.ignored,
        })
        .collect();

    let mut items = Vec::new();
    for field in entry.fields {
        let id = ItemId::new(field.id.clone())?;
        let directive = if field.section.is_some() || field.before.is_some() || field.after.is_some()
        {
            Some(PlacementDirective {
                section: field.section,
                before: field.before.map(ItemId::new).transpose()?,
                after: field.after.map(ItemId::new).transpose()?,
            })
        } else {
            None
        };
        items.push(ItemDecl {
            id,
            display_name: field.name.unwrap_or(field.id),
            directive,
            attrs: field.attrs,
            content: field.content.map(ComponentId::new).transpose()?,
        });
    }

    let ignored = entry
        .ignore
        .into_iter()
        .map(ItemId::new)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledComponent {
        items,
        sections,
        ignored,
    })
}

impl ItemSource for ManifestProvider {
    fn items_for(&self, component: &ComponentId) -> Result<ItemBatch, ProviderError> {
        let compiled = self
            .components
            .get(component)
            .ok_or_else(|| ProviderError::UnknownComponent(component.to_string()))?;
        Ok(ItemBatch {
            items: compiled.items.clone(),
            ignored: compiled.ignored.clone(),
        })
    }
}

impl SectionSource for ManifestProvider {
    fn sections_for(&self, component: &ComponentId) -> Result<Vec<SectionDecl>, ProviderError> {
        let compiled = self
            .components
            .get(component)
            .ok_or_else(|| ProviderError::UnknownComponent(component.to_string()))?;
        Ok(compiled.sections.clone())
    }
}
