//! Span painting.
//!
//! A [`SpanCanvas`] holds one [`IndicatorLayer`] per indicator category.
//! Layers behave like editor indicators: painting a range that overlaps
//! existing runs merges them into one run, and clearing a range trims or
//! splits whatever it covers. A layer therefore never holds two runs that
//! overlap each other, while separate layers may cover the same bytes.

use std::fmt;
use std::ops::Range;

/// Semantic category of a painted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Occurrences of a declared variable name.
    Variable,
    /// Identifier of a call site.
    Call,
    /// Range flagged by an error heuristic.
    Error,
    /// Match of the last find query.
    Find,
}

impl Category {
    /// All categories, in repaint order.
    pub const ALL: [Category; 4] = [
        Category::Variable,
        Category::Call,
        Category::Error,
        Category::Find,
    ];

    /// Returns the display name of the category.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Call => "call",
            Self::Error => "error",
            Self::Find => "find",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Variable => 0,
            Self::Call => 1,
            Self::Error => 2,
            Self::Find => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A categorized half-open byte range of the buffer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
    /// Category the span was painted under.
    pub category: Category,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, len: usize, category: Category) -> Self {
        Self {
            start,
            len,
            category,
        }
    }

    /// End byte offset (exclusive).
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns the byte range covered by the span.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Returns the covered text, or an empty string if the span does not
    /// fit `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range()).unwrap_or("")
    }
}

/// Painted runs for a single category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorLayer {
    /// Sorted, pairwise non-overlapping, never empty.
    runs: Vec<Range<usize>>,
}

impl IndicatorLayer {
    /// Creates an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints `len` bytes starting at `start`, merging with overlapping runs.
    pub fn fill(&mut self, start: usize, len: usize) {
        if len == 0 {
            return;
        }
        let end = start + len;
        let first = self.runs.partition_point(|run| run.end <= start);
        let last = self.runs.partition_point(|run| run.start < end);

        let merged = if first < last {
            self.runs[first].start.min(start)..self.runs[last - 1].end.max(end)
        } else {
            start..end
        };
        self.runs.splice(first..last, std::iter::once(merged));
    }

    /// Removes paint from `len` bytes starting at `start`.
    pub fn clear_range(&mut self, start: usize, len: usize) {
        if len == 0 || self.runs.is_empty() {
            return;
        }
        let end = start + len;
        let mut kept = Vec::with_capacity(self.runs.len() + 1);
        for run in self.runs.drain(..) {
            if run.end <= start || run.start >= end {
                kept.push(run);
                continue;
            }
            if run.start < start {
                kept.push(run.start..start);
            }
            if run.end > end {
                kept.push(end..run.end);
            }
        }
        self.runs = kept;
    }

    /// Removes all paint from the layer.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Returns the painted runs in ascending order.
    pub fn runs(&self) -> &[Range<usize>] {
        &self.runs
    }

    /// Returns true if the byte at `offset` is painted.
    pub fn is_painted(&self, offset: usize) -> bool {
        let idx = self.runs.partition_point(|run| run.end <= offset);
        self.runs
            .get(idx)
            .map(|run| run.start <= offset)
            .unwrap_or(false)
    }

    /// Number of painted runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns true if nothing is painted.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Returns the runs as spans of the given category.
    pub fn spans(&self, category: Category) -> Vec<Span> {
        self.runs
            .iter()
            .map(|run| Span::new(run.start, run.end - run.start, category))
            .collect()
    }
}

/// One indicator layer per category.
#[derive(Debug, Clone, Default)]
pub struct SpanCanvas {
    layers: [IndicatorLayer; 4],
}

impl SpanCanvas {
    /// Creates an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the layer for a category.
    pub fn layer(&self, category: Category) -> &IndicatorLayer {
        &self.layers[category.index()]
    }

    /// Returns the layer for a category mutably.
    pub fn layer_mut(&mut self, category: Category) -> &mut IndicatorLayer {
        &mut self.layers[category.index()]
    }

    /// Clears a category and paints every given range into it.
    pub fn repaint<I>(&mut self, category: Category, ranges: I)
    where
        I: IntoIterator<Item = Range<usize>>,
    {
        let layer = self.layer_mut(category);
        layer.clear();
        for range in ranges {
            layer.fill(range.start, range.end.saturating_sub(range.start));
        }
    }

    /// Clears every category.
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    /// Returns the categories painted at `offset`.
    pub fn categories_at(&self, offset: usize) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.layer(*category).is_painted(offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_disjoint() {
        let mut layer = IndicatorLayer::new();
        layer.fill(10, 2);
        layer.fill(0, 3);
        assert_eq!(layer.runs(), &[0..3, 10..12]);
    }

    #[test]
    fn test_fill_merges_overlaps() {
        let mut layer = IndicatorLayer::new();
        layer.fill(0, 3);
        layer.fill(5, 3);
        layer.fill(2, 4);
        assert_eq!(layer.runs(), &[0..8]);
    }

    #[test]
    fn test_touching_runs_stay_separate() {
        let mut layer = IndicatorLayer::new();
        layer.fill(0, 2);
        layer.fill(2, 2);
        assert_eq!(layer.runs(), &[0..2, 2..4]);
    }

    #[test]
    fn test_fill_zero_length_is_ignored() {
        let mut layer = IndicatorLayer::new();
        layer.fill(4, 0);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_clear_range_splits() {
        let mut layer = IndicatorLayer::new();
        layer.fill(0, 10);
        layer.clear_range(3, 2);
        assert_eq!(layer.runs(), &[0..3, 5..10]);

        layer.clear_range(0, 100);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_is_painted() {
        let mut layer = IndicatorLayer::new();
        layer.fill(4, 2);
        assert!(!layer.is_painted(3));
        assert!(layer.is_painted(4));
        assert!(layer.is_painted(5));
        assert!(!layer.is_painted(6));
    }

    #[test]
    fn test_repaint_discards_previous_pass() {
        let mut canvas = SpanCanvas::new();
        canvas.repaint(Category::Variable, vec![0..1, 8..9]);
        canvas.repaint(Category::Variable, vec![3..5]);
        assert_eq!(canvas.layer(Category::Variable).runs(), &[3..5]);
    }

    #[test]
    fn test_categories_are_independent() {
        let mut canvas = SpanCanvas::new();
        canvas.repaint(Category::Variable, vec![0..4]);
        canvas.repaint(Category::Error, vec![2..6]);
        assert_eq!(
            canvas.categories_at(3),
            vec![Category::Variable, Category::Error]
        );

        canvas.clear_all();
        assert!(canvas.categories_at(3).is_empty());
    }

    #[test]
    fn test_span_text() {
        let span = Span::new(4, 3, Category::Call);
        assert_eq!(span.text("int foo();"), "foo");
        assert_eq!(Span::new(40, 3, Category::Call).text("x"), "");
    }
}
