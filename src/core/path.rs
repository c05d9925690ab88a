//! core::path
//!
//! The path grammar for addressing document nodes.
//!
//! # Grammar
//!
//! - Segments are separated by `/`.
//! - A segment wrapped in double quotes escapes embedded `/` characters;
//!   the quoted content is taken literally and not re-split.
//! - `.` resolves to the current node.
//! - `..` resolves to the parent, or to the node itself at the root (the
//!   defined edge case, see [`Segment::Parent`]).
//! - Empty segments are skipped, so `a//b` equals `a/b`.
//!
//! Quote spans are detected by pairing successive `"` occurrences left to
//! right; a trailing unmatched quote does not open a span and is kept as a
//! literal character.
//!
//! # Example
//!
//! ```
//! use folio::core::path::{split, Segment};
//!
//! assert_eq!(
//!     split("a/b/c"),
//!     vec![
//!         Segment::Named("a".to_string()),
//!         Segment::Named("b".to_string()),
//!         Segment::Named("c".to_string()),
//!     ]
//! );
//!
//! // One literal segment named `a/b`, not two nested segments.
//! assert_eq!(split("\"a/b\""), vec![Segment::Named("a/b".to_string())]);
//!
//! assert_eq!(split("../x"), vec![Segment::Parent, Segment::Named("x".to_string())]);
//! ```

/// One resolved path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A child named exactly this string.
    Named(String),
    /// `.` - the current node.
    Current,
    /// `..` - the parent node. At the root (no parent) this resolves to
    /// the node itself.
    Parent,
}

/// Positions of `/` separators that are not protected by a quote span.
fn separator_positions(path: &str) -> Vec<usize> {
    // Pair successive quotes left to right; a trailing unmatched quote
    // opens no span.
    let quote_positions: Vec<usize> = path
        .char_indices()
        .filter(|(_, c)| *c == '"')
        .map(|(i, _)| i)
        .collect();
    let spans: Vec<(usize, usize)> = quote_positions
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();

    path.char_indices()
        .filter(|(i, c)| {
            *c == '/' && !spans.iter().any(|(open, close)| open < i && i < close)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Strip quote characters that belong to matched pairs within a raw
/// segment. An unmatched trailing quote stays literal.
fn unquote(raw: &str) -> String {
    let quote_count = raw.chars().filter(|c| *c == '"').count();
    let mut keep_last_quote = quote_count % 2 == 1;
    let mut seen = 0usize;

    raw.chars()
        .rev()
        .filter(|c| {
            if *c != '"' {
                return true;
            }
            seen += 1;
            if seen == 1 && keep_last_quote {
                keep_last_quote = false;
                return true;
            }
            false
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Split a path string into segments per the grammar above.
pub fn split(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut cuts = separator_positions(path);
    cuts.push(path.len());

    for cut in cuts {
        let raw = &path[start..cut];
        start = cut + 1;

        if raw.is_empty() {
            continue;
        }
        match raw {
            "." => segments.push(Segment::Current),
            ".." => segments.push(Segment::Parent),
            _ => {
                let name = unquote(raw);
                if !name.is_empty() {
                    segments.push(Segment::Named(name));
                }
            }
        }
    }

    segments
}

/// Quote a node name for embedding in a path string.
///
/// Names containing `/` are wrapped in double quotes so [`split`] returns
/// them as a single segment; other names pass through unchanged.
///
/// # Example
///
/// ```
/// use folio::core::path::quote_segment;
///
/// assert_eq!(quote_segment("plain"), "plain");
/// assert_eq!(quote_segment("a/b"), "\"a/b\"");
/// ```
pub fn quote_segment(name: &str) -> String {
    if name.contains('/') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

/// Join node names into a path string, quoting as needed.
pub fn join<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(quote_segment)
        .collect::<Vec<_>>()
        .join("/")
}
