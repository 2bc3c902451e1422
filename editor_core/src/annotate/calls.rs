//! Call-site extraction.
//!
//! Any identifier followed by optional whitespace and `(` counts as a call,
//! which also picks up control keywords (`if (`, `while (`) and function
//! definitions. Calls through templates or member pointers are missed.

use super::paint::{Category, Span};
use regex::Regex;

/// Finds identifiers in call position.
#[derive(Debug, Clone)]
pub struct CallScanner {
    pattern: Regex,
}

impl Default for CallScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl CallScanner {
    /// Creates a scanner with the built-in call pattern.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\b([a-zA-Z_][a-zA-Z0-9_]*)\s*\(").expect("call pattern is valid"),
        }
    }

    /// Returns one span per call site, covering the identifier only.
    pub fn scan(&self, text: &str) -> Vec<Span> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|name| Span::new(name.start(), name.len(), Category::Call))
            .collect()
    }

    /// Returns the distinct names found in call position.
    pub fn names(&self, text: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .scan(text)
            .iter()
            .map(|span| span.text(text).to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
