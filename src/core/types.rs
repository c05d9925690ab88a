//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NodeName`] - Validated document node name
//! - [`ItemId`] - Stable identity of a content item
//! - [`ComponentId`] - Identity of a declared component (container scope)
//! - [`UtcTimestamp`] - RFC3339 timestamp
//! - [`Fingerprint`] - Hash over a composed tree for determinism checks
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use folio::core::types::{ComponentId, ItemId, NodeName};
//!
//! // Valid constructions
//! let name = NodeName::new("summary").unwrap();
//! let item = ItemId::new("title_field").unwrap();
//! let component = ComponentId::new("app.settings").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(NodeName::new("").is_err());
//! assert!(ItemId::new("has\nnewline").is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid node name: {0}")]
    InvalidNodeName(String),

    #[error("invalid item id: {0}")]
    InvalidItemId(String),

    #[error("invalid component id: {0}")]
    InvalidComponentId(String),
}

fn check_token(value: &str, what: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{what} cannot be empty"));
    }
    if value.chars().any(|c| c.is_ascii_control()) {
        return Err(format!("{what} cannot contain control characters"));
    }
    if value.trim() != value {
        return Err(format!("{what} cannot have leading or trailing whitespace"));
    }
    Ok(())
}

/// A validated document node name.
///
/// Node names identify a node among its siblings. They may contain any
/// printable characters including `/` (a literal slash is addressable
/// through the quoted path syntax), but must be non-empty, free of control
/// characters, and trimmed.
///
/// # Example
///
/// ```
/// use folio::core::types::NodeName;
///
/// let name = NodeName::new("general").unwrap();
/// assert_eq!(name.as_str(), "general");
///
/// // A literal slash is allowed; path quoting makes it addressable.
/// let odd = NodeName::new("input/output").unwrap();
/// assert_eq!(odd.as_str(), "input/output");
///
/// assert!(NodeName::new("").is_err());
/// assert!(NodeName::new(" padded ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeName(String);

impl NodeName {
    /// Create a new validated node name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNodeName` if the name is empty, padded,
    /// or contains control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_token(&name, "node name").map_err(TypeError::InvalidNodeName)?;
        Ok(Self(name))
    }

    /// Get the node name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<NodeName> for String {
    fn from(name: NodeName) -> Self {
        name.0
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stable identity of a content item within one build.
///
/// Item ids come from the item source (for the manifest provider, the
/// declared field id) and are the handles placement directives use for
/// `before`/`after` references.
///
/// # Example
///
/// ```
/// use folio::core::types::ItemId;
///
/// let id = ItemId::new("title").unwrap();
/// assert_eq!(id.as_str(), "title");
/// assert!(ItemId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Create a new validated item id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidItemId` for empty, padded, or
    /// control-character-bearing ids.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        check_token(&id, "item id").map_err(TypeError::InvalidItemId)?;
        Ok(Self(id))
    }

    /// Get the item id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity of a declared component (a container scope's host type).
///
/// # Example
///
/// ```
/// use folio::core::types::ComponentId;
///
/// let id = ComponentId::new("app").unwrap();
/// assert_eq!(id.as_str(), "app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentId(String);

impl ComponentId {
    /// Create a new validated component id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidComponentId` for empty, padded, or
    /// control-character-bearing ids.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        check_token(&id, "component id").map_err(TypeError::InvalidComponentId)?;
        Ok(Self(id))
    }

    /// Get the component id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ComponentId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use folio::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// println!("Current time: {}", now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// A stable hash over a composed document tree.
///
/// The fingerprint digests the tree's nodes in document order, so two
/// builds match exactly when they produced the same names, attributes and
/// sibling order. Unlike a set hash, input order is significant: sibling
/// order is part of a document's meaning.
///
/// # Example
///
/// ```
/// use folio::core::types::Fingerprint;
///
/// let lines = vec!["root".to_string(), "root/child".to_string()];
/// let fp = Fingerprint::compute(&lines);
///
/// // Same lines produce the same fingerprint
/// assert_eq!(fp, Fingerprint::compute(&lines));
///
/// // Order changes the fingerprint
/// let swapped = vec!["root/child".to_string(), "root".to_string()];
/// assert_ne!(fp, Fingerprint::compute(&swapped));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint from pre-rendered node lines, in order.
    pub fn compute(lines: &[String]) -> Self {
        let mut hasher = Sha256::new();
        for line in lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }

        let result = hasher.finalize();
        Self(hex::encode(result))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get an abbreviated form of the fingerprint.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
