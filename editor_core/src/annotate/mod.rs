//! Live annotation engine.
//!
//! Re-derives variable, call and error annotations from the full buffer
//! text. Every pass starts from scratch; there is no incremental state.

mod calls;
mod errors;
mod paint;
mod variables;

pub use calls::CallScanner;
pub use errors::{
    ErrorFinding, ErrorRule, ErrorScanner, MissingNamespaceRule, MissingSemicolonRule,
    ReturnWithoutSemicolonRule, RuleId, StreamOperatorRule, UnmatchedQuoteRule,
    USING_NAMESPACE_STD,
};
pub use paint::{Category, IndicatorLayer, Span, SpanCanvas};
pub use variables::{VariableScanner, TYPE_KEYWORDS};

use crate::config::AnnotationSettings;
use std::collections::BTreeSet;

/// Result of one annotation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Names found by declaration scanning.
    pub variable_names: BTreeSet<String>,
    /// Variable spans, sorted and non-overlapping.
    pub variables: Vec<Span>,
    /// Call spans, sorted and non-overlapping.
    pub calls: Vec<Span>,
    /// Error findings grouped by rule; may overlap.
    pub errors: Vec<ErrorFinding>,
}

impl Annotations {
    /// Returns the spans of a category. Error findings are reported as
    /// their painted runs. Find matches are not annotations.
    pub fn spans(&self, category: Category) -> Vec<Span> {
        match category {
            Category::Variable => self.variables.clone(),
            Category::Call => self.calls.clone(),
            Category::Error => {
                let mut layer = IndicatorLayer::new();
                for finding in &self.errors {
                    layer.fill(finding.start, finding.len);
                }
                layer.spans(Category::Error)
            }
            Category::Find => Vec::new(),
        }
    }

    /// Returns the findings produced by one rule.
    pub fn findings_for(&self, rule: RuleId) -> impl Iterator<Item = &ErrorFinding> {
        self.errors.iter().filter(move |finding| finding.rule == rule)
    }

    /// Returns true if the pass produced nothing at all.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.calls.is_empty() && self.errors.is_empty()
    }
}

/// Runs the variable, call and error scanners.
#[derive(Debug)]
pub struct AnnotationEngine {
    variables: VariableScanner,
    calls: CallScanner,
    errors: ErrorScanner,
    settings: AnnotationSettings,
}

impl Default for AnnotationEngine {
    fn default() -> Self {
        Self::new(AnnotationSettings::default())
    }
}

impl AnnotationEngine {
    /// Creates an engine with the given category switches.
    pub fn new(settings: AnnotationSettings) -> Self {
        Self {
            variables: VariableScanner::new(),
            calls: CallScanner::new(),
            errors: ErrorScanner::new(),
            settings,
        }
    }

    /// Returns the category switches.
    pub fn settings(&self) -> &AnnotationSettings {
        &self.settings
    }

    /// Replaces the category switches.
    pub fn set_settings(&mut self, settings: AnnotationSettings) {
        self.settings = settings;
    }

    /// Recomputes every annotation over `text`.
    ///
    /// Order: variable extraction, variable occurrences, call sites, error
    /// rules. A disabled category comes back empty.
    pub fn recompute(&self, text: &str) -> Annotations {
        let mut annotations = Annotations::default();

        if self.settings.variables {
            annotations.variable_names = self.variables.extract(text);
            let mut layer = IndicatorLayer::new();
            for range in self.variables.occurrences(text, &annotations.variable_names) {
                layer.fill(range.start, range.end - range.start);
            }
            annotations.variables = layer.spans(Category::Variable);
        }

        if self.settings.calls {
            let mut layer = IndicatorLayer::new();
            for span in self.calls.scan(text) {
                layer.fill(span.start, span.len);
            }
            annotations.calls = layer.spans(Category::Call);
        }

        if self.settings.errors {
            annotations.errors = self.errors.scan(text);
        }

        log::debug!(
            "annotation pass: {} names, {} variable spans, {} call spans, {} findings",
            annotations.variable_names.len(),
            annotations.variables.len(),
            annotations.calls.len(),
            annotations.errors.len()
        );
        annotations
    }

    /// Clears and repaints every category of `canvas` from `annotations`.
    pub fn paint(&self, annotations: &Annotations, canvas: &mut SpanCanvas) {
        canvas.repaint(
            Category::Variable,
            annotations.variables.iter().map(Span::range),
        );
        canvas.repaint(Category::Call, annotations.calls.iter().map(Span::range));
        canvas.repaint(
            Category::Error,
            annotations.errors.iter().map(ErrorFinding::range),
        );
    }
}

/// Recomputes annotations with the default engine.
///
/// Hosts that annotate repeatedly should keep an [`AnnotationEngine`] so the
/// patterns are compiled once.
pub fn recompute_annotations(text: &str) -> Annotations {
    AnnotationEngine::default().recompute(text)
}
