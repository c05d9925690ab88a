//! core::attrs
//!
//! Node attributes: ordered storage, merge policy, and the stringified-set
//! value convention.
//!
//! # Merge Policy
//!
//! Setting an attribute that already exists follows one of two rules:
//!
//! - **Scalar** values replace the old value, unless the new value is
//!   blank, in which case the old value is kept.
//! - **Stringified sets** (values of the form `{a,b,c}`) merge by union:
//!   old elements first, then new elements not already present, preserving
//!   insertion order on both sides.
//!
//! # Example
//!
//! ```
//! use folio::core::attrs::merge_value;
//!
//! assert_eq!(merge_value(Some("old"), "new"), "new");
//! assert_eq!(merge_value(Some("old"), ""), "old");
//! assert_eq!(merge_value(Some("{a,b}"), "{b,c}"), "{a,b,c}");
//! assert_eq!(merge_value(None, "fresh"), "fresh");
//! ```

use indexmap::IndexMap;

/// Ordered attribute storage for one node.
pub type AttrMap = IndexMap<String, String>;

/// The implicit attribute present on every node.
pub const KIND_KEY: &str = "kind";

/// Check whether a value uses the stringified-set encoding `{...}`.
pub fn is_set_encoded(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('{') && value.ends_with('}')
}

/// Parse a stringified set into its elements.
///
/// Elements are comma-separated and trimmed; empty elements are dropped,
/// so `{}` parses to no elements.
///
/// # Example
///
/// ```
/// use folio::core::attrs::parse_set;
///
/// assert_eq!(parse_set("{a, b,c}"), vec!["a", "b", "c"]);
/// assert_eq!(parse_set("{}"), Vec::<String>::new());
/// ```
pub fn parse_set(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(value);

    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format elements back into the stringified-set encoding.
pub fn format_set<'a>(elements: impl IntoIterator<Item = &'a str>) -> String {
    let inner: Vec<&str> = elements.into_iter().collect();
    format!("{{{}}}", inner.join(","))
}

/// Merge a new attribute value against the existing one.
///
/// Implements the full policy: union for two set-encoded values, and
/// replace-unless-blank otherwise.
pub fn merge_value(old: Option<&str>, new: &str) -> String {
    let Some(old) = old else {
        return new.to_string();
    };

    if is_set_encoded(old) && is_set_encoded(new) {
        let mut union: Vec<String> = Vec::new();
        for element in parse_set(old).into_iter().chain(parse_set(new)) {
            if !union.contains(&element) {
                union.push(element);
            }
        }
        return format_set(union.iter().map(String::as_str));
    }

    if new.is_empty() {
        old.to_string()
    } else {
        new.to_string()
    }
}
