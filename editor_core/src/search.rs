//! Plain-text find and replace.
//!
//! Matching is case-sensitive and scans left to right, resuming after each
//! match, so matches never overlap.

use std::ops::Range;

/// Returns the byte ranges of every non-overlapping occurrence of `query`.
pub fn find_all(text: &str, query: &str) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }
    text.match_indices(query)
        .map(|(start, matched)| start..start + matched.len())
        .collect()
}

/// Result of a replace-all pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    /// Number of occurrences replaced.
    pub count: usize,
}

/// Replaces every non-overlapping occurrence of `query`. Replaced text is
/// never searched again, so a replacement containing the query terminates.
pub fn replace_all(text: &str, query: &str, replacement: &str) -> Replacement {
    let count = find_all(text, query).len();
    let text = if count == 0 {
        text.to_string()
    } else {
        text.replace(query, replacement)
    };
    Replacement { text, count }
}
