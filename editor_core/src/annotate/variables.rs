//! Variable name extraction.
//!
//! Declarations are recognized by shape only: a primitive type keyword,
//! whitespace, then a comma-separated list of `name` or `name = init`
//! clauses ending in `;`. Every identifier inside the matched declaration
//! except the leading keyword is taken as a variable name, so identifiers
//! that appear inside an initializer (`int x = y;`) are collected too.
//!
//! Known misses: user-defined types, declarations split over several lines
//! and initializers that contain commas (`int x = f(a, b);`).

use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;

/// Type keywords that introduce a recognized declaration.
pub const TYPE_KEYWORDS: [&str; 5] = ["bool", "int", "float", "double", "string"];

const IDENTIFIER: &str = r"[a-zA-Z_][a-zA-Z0-9_]*";

/// Finds declared variable names and their occurrences.
#[derive(Debug, Clone)]
pub struct VariableScanner {
    declaration: Regex,
    identifier: Regex,
}

impl Default for VariableScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableScanner {
    /// Creates a scanner with the built-in declaration pattern.
    pub fn new() -> Self {
        let pattern = format!(
            r"\b(?:{types})\b\s+{id}(?:\s*=\s*[^,;]+)?(?:\s*,\s*{id}(?:\s*=\s*[^,;]+)?)*\s*;",
            types = TYPE_KEYWORDS.join("|"),
            id = IDENTIFIER,
        );
        Self {
            declaration: Regex::new(&pattern).expect("declaration pattern is valid"),
            identifier: Regex::new(IDENTIFIER).expect("identifier pattern is valid"),
        }
    }

    /// Returns the unique variable names declared anywhere in `text`.
    ///
    /// Matching resumes right after each declaration, so declarations never
    /// overlap.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for declaration in self.declaration.find_iter(text) {
            names.extend(
                self.identifier
                    .find_iter(declaration.as_str())
                    .skip(1)
                    .map(|m| m.as_str().to_string()),
            );
        }
        names
    }

    /// Returns the byte ranges of every occurrence of every name.
    ///
    /// This is plain substring search: `a` is found inside `main`. Matches of
    /// one name do not overlap each other; matches of different names can.
    pub fn occurrences(&self, text: &str, names: &BTreeSet<String>) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        for name in names.iter().filter(|name| !name.is_empty()) {
            let mut from = 0;
            while let Some(pos) = text[from..].find(name.as_str()) {
                let start = from + pos;
                ranges.push(start..start + name.len());
                from = start + name.len();
            }
        }
        ranges.sort_by_key(|range| (range.start, range.end));
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        VariableScanner::new().extract(text).into_iter().collect()
    }

    #[test]
    fn test_no_type_keywords() {
        assert!(names("x = 5; foo(x); return x;").is_empty());
        assert!(names("").is_empty());
    }

    #[test]
    fn test_comma_separated_declaration() {
        assert_eq!(names("int a, b = 5; cout << a;"), vec!["a", "b"]);
    }

    #[test]
    fn test_all_type_keywords() {
        let text = "bool ok; float f = 1.5; double d; string s = \"\"; int n;";
        assert_eq!(names(text), vec!["d", "f", "n", "ok", "s"]);
    }

    #[test]
    fn test_initializer_identifiers_are_collected() {
        assert_eq!(names("int total = count;"), vec!["count", "total"]);
    }

    #[test]
    fn test_user_defined_types_ignored() {
        assert!(names("Widget w; vector<int> v;").is_empty());
    }

    #[test]
    fn test_keyword_inside_word_ignored() {
        assert!(names("print x;").is_empty());
        assert!(names("integer y;").is_empty());
    }

    #[test]
    fn test_unterminated_declaration_ignored() {
        assert!(names("int a = 5\n").is_empty());
    }

    #[test]
    fn test_occurrences_use_substring_search() {
        let scanner = VariableScanner::new();
        let text = "int a; main(a);";
        let found = scanner.extract(text);
        let ranges = scanner.occurrences(text, &found);
        // "a" inside "main" is matched as well.
        assert_eq!(ranges, vec![4..5, 8..9, 12..13]);
    }

    #[test]
    fn test_occurrences_of_repeated_name_do_not_overlap() {
        let scanner = VariableScanner::new();
        let names: BTreeSet<String> = ["aa".to_string()].into_iter().collect();
        assert_eq!(scanner.occurrences("aaaa", &names), vec![0..2, 2..4]);
    }
}
