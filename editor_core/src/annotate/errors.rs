//! Heuristic error rules.
//!
//! Every rule is a small pattern scanner over the raw text. None of them
//! know about string literals or comments, so all of them fire inside those
//! too. Each rule documents what it over- and under-reports.

use regex::Regex;
use std::fmt;
use std::ops::Range;

/// Identifies the rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleId {
    MissingSemicolon,
    UnmatchedQuote,
    StreamOperatorMisuse,
    ReturnWithoutSemicolon,
    MissingNamespaceQualifier,
}

impl RuleId {
    /// All rules in evaluation order.
    pub const ALL: [RuleId; 5] = [
        RuleId::MissingSemicolon,
        RuleId::UnmatchedQuote,
        RuleId::StreamOperatorMisuse,
        RuleId::ReturnWithoutSemicolon,
        RuleId::MissingNamespaceQualifier,
    ];

    /// Stable short code for the rule.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSemicolon => "missing-semicolon",
            Self::UnmatchedQuote => "unmatched-quote",
            Self::StreamOperatorMisuse => "stream-operator",
            Self::ReturnWithoutSemicolon => "return-without-semicolon",
            Self::MissingNamespaceQualifier => "missing-namespace",
        }
    }

    /// Human readable description of the finding.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingSemicolon => "statement may be missing a ';'",
            Self::UnmatchedQuote => "unmatched '\"'",
            Self::StreamOperatorMisuse => "'cout' is used with '>>', expected '<<'",
            Self::ReturnWithoutSemicolon => "'return 0' is missing a ';'",
            Self::MissingNamespaceQualifier => "'std::' used without 'using namespace std;'",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A byte range flagged by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorFinding {
    /// Start byte offset.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
    /// Rule that produced the finding.
    pub rule: RuleId,
}

impl ErrorFinding {
    /// Creates a new finding.
    pub fn new(start: usize, len: usize, rule: RuleId) -> Self {
        Self { start, len, rule }
    }

    /// End byte offset (exclusive).
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns the byte range covered by the finding.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// A single heuristic check.
pub trait ErrorRule: Send + Sync {
    /// The rule's identifier.
    fn id(&self) -> RuleId;

    /// Appends every finding for `text` to `findings`.
    fn scan(&self, text: &str, findings: &mut Vec<ErrorFinding>);
}

/// Lines that start with a declaration keyword or `return` but have no
/// `;`, `{` or `}` before the line break. The span runs from the keyword
/// through the line break.
///
/// Over-reports statements continued on the next line and function headers
/// whose `{` sits on its own line. Misses the last line of a buffer that has
/// no trailing line break.
#[derive(Debug, Clone)]
pub struct MissingSemicolonRule {
    pattern: Regex,
}

impl MissingSemicolonRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"(?m)^[ \t]*((?:return|int|float|double|bool|string)\b[^;{}\n]*\n)")
                .expect("missing-semicolon pattern is valid"),
        }
    }
}

impl Default for MissingSemicolonRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorRule for MissingSemicolonRule {
    fn id(&self) -> RuleId {
        RuleId::MissingSemicolon
    }

    fn scan(&self, text: &str, findings: &mut Vec<ErrorFinding>) {
        for caps in self.pattern.captures_iter(text) {
            if let Some(statement) = caps.get(1) {
                findings.push(ErrorFinding::new(statement.start(), statement.len(), self.id()));
            }
        }
    }
}

/// An odd number of `"` not preceded by `\` flags the last `"` in the text.
///
/// Character literals (`'"'`) and escaped backslashes before a quote (`\\"`)
/// throw the count off. The flagged quote is simply the last one, which is
/// not necessarily the one left open.
#[derive(Debug, Clone, Default)]
pub struct UnmatchedQuoteRule;

impl ErrorRule for UnmatchedQuoteRule {
    fn id(&self) -> RuleId {
        RuleId::UnmatchedQuote
    }

    fn scan(&self, text: &str, findings: &mut Vec<ErrorFinding>) {
        let bytes = text.as_bytes();
        let count = bytes
            .iter()
            .enumerate()
            .filter(|&(i, &b)| b == b'"' && (i == 0 || bytes[i - 1] != b'\\'))
            .count();
        if count % 2 == 1 {
            if let Some(pos) = text.rfind('"') {
                findings.push(ErrorFinding::new(pos, 1, self.id()));
            }
        }
    }
}

/// `cout` followed, ignoring whitespace, by `>>`.
///
/// Only catches the unqualified name or `std::cout`; streams held in other
/// variables are never checked.
#[derive(Debug, Clone)]
pub struct StreamOperatorRule {
    pattern: Regex,
}

impl StreamOperatorRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\bcout\s*>>").expect("stream-operator pattern is valid"),
        }
    }
}

impl Default for StreamOperatorRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorRule for StreamOperatorRule {
    fn id(&self) -> RuleId {
        RuleId::StreamOperatorMisuse
    }

    fn scan(&self, text: &str, findings: &mut Vec<ErrorFinding>) {
        for m in self.pattern.find_iter(text) {
            findings.push(ErrorFinding::new(m.start(), m.len(), self.id()));
        }
    }
}

/// `return 0` directly followed by a line break. The span runs through the
/// line break.
///
/// Only spaces and tabs may separate `return`, `0` and the break, so a
/// statement split across lines (`return\n0\n`) is not flagged.
///
/// Overlaps with [`MissingSemicolonRule`] by construction. Other return
/// values are left to that rule.
#[derive(Debug, Clone)]
pub struct ReturnWithoutSemicolonRule {
    pattern: Regex,
}

impl ReturnWithoutSemicolonRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\breturn[ \t]+0[ \t]*\r?\n").expect("return pattern is valid"),
        }
    }
}

impl Default for ReturnWithoutSemicolonRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorRule for ReturnWithoutSemicolonRule {
    fn id(&self) -> RuleId {
        RuleId::ReturnWithoutSemicolon
    }

    fn scan(&self, text: &str, findings: &mut Vec<ErrorFinding>) {
        for m in self.pattern.find_iter(text) {
            findings.push(ErrorFinding::new(m.start(), m.len(), self.id()));
        }
    }
}

/// Every `std::` when the text lacks `using namespace std;`.
///
/// This flags perfectly valid qualified code; it mirrors a teaching style
/// where the using-directive is expected at the top of each file.
#[derive(Debug, Clone)]
pub struct MissingNamespaceRule {
    pattern: Regex,
}

/// The directive whose presence silences [`MissingNamespaceRule`].
pub const USING_NAMESPACE_STD: &str = "using namespace std;";

impl MissingNamespaceRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\bstd::").expect("namespace pattern is valid"),
        }
    }
}

impl Default for MissingNamespaceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorRule for MissingNamespaceRule {
    fn id(&self) -> RuleId {
        RuleId::MissingNamespaceQualifier
    }

    fn scan(&self, text: &str, findings: &mut Vec<ErrorFinding>) {
        if text.contains(USING_NAMESPACE_STD) {
            return;
        }
        for m in self.pattern.find_iter(text) {
            findings.push(ErrorFinding::new(m.start(), m.len(), self.id()));
        }
    }
}

/// Runs every rule in a fixed order.
pub struct ErrorScanner {
    rules: Vec<Box<dyn ErrorRule>>,
}

impl Default for ErrorScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ErrorScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorScanner")
            .field("rules", &self.rule_ids())
            .finish()
    }
}

impl ErrorScanner {
    /// Creates a scanner with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(MissingSemicolonRule::new()),
                Box::new(UnmatchedQuoteRule),
                Box::new(StreamOperatorRule::new()),
                Box::new(ReturnWithoutSemicolonRule::new()),
                Box::new(MissingNamespaceRule::new()),
            ],
        }
    }

    /// Returns the identifiers of the active rules, in evaluation order.
    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Runs every rule over `text`. Findings are grouped by rule in
    /// evaluation order and may overlap.
    pub fn scan(&self, text: &str) -> Vec<ErrorFinding> {
        let mut findings = Vec::new();
        for rule in &self.rules {
            let before = findings.len();
            rule.scan(text, &mut findings);
            log::trace!("rule {} produced {} findings", rule.id(), findings.len() - before);
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &dyn ErrorRule, text: &str) -> Vec<ErrorFinding> {
        let mut findings = Vec::new();
        rule.scan(text, &mut findings);
        findings
    }

    #[test]
    fn test_missing_semicolon_flags_line() {
        let text = "int main() {\n    int x = 5\n    return x;\n}\n";
        let findings = run(&MissingSemicolonRule::new(), text);
        assert_eq!(findings.len(), 1);
        assert_eq!(&text[findings[0].range()], "int x = 5\n");
    }

    #[test]
    fn test_missing_semicolon_ignores_terminated_and_braced_lines() {
        let text = "int x = 5;\nint main() {\nreturn 0;\n}\n";
        assert!(run(&MissingSemicolonRule::new(), text).is_empty());
    }

    #[test]
    fn test_missing_semicolon_requires_line_start() {
        let text = "foo(int a)\n";
        assert!(run(&MissingSemicolonRule::new(), text).is_empty());
    }

    #[test]
    fn test_missing_semicolon_last_line_without_break() {
        assert!(run(&MissingSemicolonRule::new(), "return x").is_empty());
    }

    #[test]
    fn test_missing_semicolon_consecutive_lines() {
        let text = "int a\nint b\n";
        let findings = run(&MissingSemicolonRule::new(), text);
        assert_eq!(
            findings.iter().map(|f| f.range()).collect::<Vec<_>>(),
            vec![0..6, 6..12]
        );
    }

    #[test]
    fn test_even_quotes_not_flagged() {
        let text = r#"cout << "a" << "b";"#;
        assert!(run(&UnmatchedQuoteRule, text).is_empty());
    }

    #[test]
    fn test_odd_quotes_flag_last_quote() {
        let text = r#"cout << "a" << "b;"#;
        let findings = run(&UnmatchedQuoteRule, text);
        assert_eq!(findings, vec![ErrorFinding::new(15, 1, RuleId::UnmatchedQuote)]);
    }

    #[test]
    fn test_escaped_quotes_not_counted() {
        let text = r#"s = "say \"hi\"";"#;
        assert!(run(&UnmatchedQuoteRule, text).is_empty());
    }

    #[test]
    fn test_stream_operator_misuse() {
        let text = "cout >> x;\ncin >> y;\ncout<<z;\nstd::cout  >>w;";
        let findings = run(&StreamOperatorRule::new(), text);
        let flagged: Vec<&str> = findings.iter().map(|f| &text[f.range()]).collect();
        assert_eq!(flagged, vec!["cout >>", "cout  >>"]);
    }

    #[test]
    fn test_return_zero_without_semicolon() {
        let text = "int main() {\n    return 0\n}\n";
        let findings = run(&ReturnWithoutSemicolonRule::new(), text);
        assert_eq!(findings.len(), 1);
        assert_eq!(&text[findings[0].range()], "return 0\n");

        assert!(run(&ReturnWithoutSemicolonRule::new(), "return 0;\n").is_empty());
        assert!(run(&ReturnWithoutSemicolonRule::new(), "return 10\n").is_empty());
    }

    #[test]
    fn test_return_zero_split_across_lines() {
        let rule = ReturnWithoutSemicolonRule::new();
        assert!(run(&rule, "return\n0\n").is_empty());
        assert_eq!(run(&rule, "return 0\n\n").len(), 1);
        assert_eq!(run(&rule, "return\t0 \r\n").len(), 1);
    }

    #[test]
    fn test_std_without_using_directive() {
        let text = "std::string name;";
        let findings = run(&MissingNamespaceRule::new(), text);
        assert_eq!(
            findings,
            vec![ErrorFinding::new(0, 5, RuleId::MissingNamespaceQualifier)]
        );
    }

    #[test]
    fn test_using_directive_silences_namespace_rule() {
        let text = "using namespace std;\nstd::string name;";
        assert!(run(&MissingNamespaceRule::new(), text).is_empty());
    }

    #[test]
    fn test_scanner_order_and_overlap() {
        let scanner = ErrorScanner::new();
        assert_eq!(scanner.rule_ids(), RuleId::ALL.to_vec());

        let text = "return 0\n";
        let rules: Vec<RuleId> = scanner.scan(text).iter().map(|f| f.rule).collect();
        assert_eq!(
            rules,
            vec![RuleId::MissingSemicolon, RuleId::ReturnWithoutSemicolon]
        );
    }

    #[test]
    fn test_clean_program_has_no_findings() {
        let text = "#include <iostream>\nusing namespace std;\n\nint main() {\n    int x = 1;\n    cout << x << endl;\n    return 0;\n}\n";
        assert!(ErrorScanner::new().scan(text).is_empty());
    }
}
