//! core::naming
//!
//! Node naming rules derived from item and section display text.
//!
//! # Features
//!
//! - Generate node-name slugs from display names and section titles
//! - Append numeric suffixes until a name is unique among siblings
//!
//! The numeric-suffix routine is the single source of automatic naming:
//! the document tree calls it for colliding children, and section nodes
//! derive their names from titles through [`slugify`] first.

/// Generate a node-name slug from a display name or section title.
///
/// Converts free-form display text into a stable node name:
/// - Lowercase
/// - Spaces and underscores become single underscores
/// - Remove characters that are not ASCII alphanumerics
/// - Truncate to `max_len` characters
///
/// Returns `"node"` when nothing survives the cleanup, so callers always
/// get a usable name.
///
/// # Example
///
/// ```
/// use folio::core::naming::slugify;
///
/// assert_eq!(slugify("Billing Address", 50), "billing_address");
/// assert_eq!(slugify("Qty (max 10)", 50), "qty_max_10");
/// assert_eq!(slugify("---", 50), "node");
/// ```
pub fn slugify(display: &str, max_len: usize) -> String {
    let cleaned: String = display
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else if c == ' ' || c == '_' || c == '-' {
                '_'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(max_len)
        .collect();

    if cleaned.is_empty() {
        "node".to_string()
    } else {
        cleaned
    }
}

/// Find a unique name by appending `_1`, `_2`, ... to `desired`.
///
/// `taken` reports whether a candidate is already in use. The desired name
/// itself is returned unchanged when free.
///
/// # Example
///
/// ```
/// use folio::core::naming::uniquify;
///
/// let taken = ["item".to_string(), "item_1".to_string()];
/// let name = uniquify("item", |candidate| taken.contains(&candidate.to_string()));
/// assert_eq!(name, "item_2");
/// ```
pub fn uniquify(desired: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(desired) {
        return desired.to_string();
    }

    let mut counter = 1usize;
    loop {
        let candidate = format!("{desired}_{counter}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
