//! Lexical colourising with tree-sitter.
//!
//! The whole buffer is re-parsed and re-styled on every content change, ahead
//! of the annotation pass.

use super::language::Language;
use super::theme::{Color, Theme, TokenStyle};
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// Structural keywords, coloured as [`TokenStyle::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "class", "struct", "if", "else", "for", "while", "return", "switch", "case", "break",
    "continue", "void", "using",
];

/// Access, type and declaration keywords, coloured as
/// [`TokenStyle::SecondaryKeyword`].
pub const SECONDARY_KEYWORDS: &[&str] = &[
    "public",
    "private",
    "protected",
    "virtual",
    "override",
    "const",
    "int",
    "bool",
    "float",
    "double",
    "string",
    "include",
    "namespace",
];

/// A highlighted span representing a range of text with a style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightSpan {
    /// Start byte offset in the source.
    pub start_byte: usize,
    /// End byte offset in the source.
    pub end_byte: usize,
    /// Token style for this span.
    pub style: TokenStyle,
}

impl HighlightSpan {
    /// Creates a new highlight span.
    pub fn new(start_byte: usize, end_byte: usize, style: TokenStyle) -> Self {
        Self {
            start_byte,
            end_byte,
            style,
        }
    }

    /// Returns true if `byte` lies inside the span.
    pub fn contains(&self, byte: usize) -> bool {
        self.start_byte <= byte && byte < self.end_byte
    }
}

/// Syntax highlighter producing non-overlapping token spans in byte order.
pub struct SyntaxHighlighter {
    parser: Parser,
    tree: Option<Tree>,
    language: Language,
    theme: Theme,
    spans: Vec<HighlightSpan>,
}

impl SyntaxHighlighter {
    /// Creates a plain-text highlighter with the default theme.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            tree: None,
            language: Language::PlainText,
            theme: Theme::default(),
            spans: Vec::new(),
        }
    }

    /// Creates a highlighter for `language`.
    pub fn for_language(language: Language) -> Self {
        let mut highlighter = Self::new();
        highlighter.set_language(language);
        highlighter
    }

    /// Sets the syntax theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Returns a reference to the current theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Sets the language and configures the parser.
    pub fn set_language(&mut self, language: Language) {
        if self.language == language {
            return;
        }

        self.language = language;
        self.tree = None;
        self.spans.clear();

        if let Some(ts_lang) = language.tree_sitter_language() {
            if let Err(err) = self.parser.set_language(&ts_lang) {
                log::error!("failed to load {} grammar: {}", language.name(), err);
                self.language = Language::PlainText;
            }
        }
    }

    /// Returns the current language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns whether this highlighter produces any spans.
    pub fn has_highlighting(&self) -> bool {
        self.language.has_highlighting()
    }

    /// Parses `source` from scratch and rebuilds the token spans.
    pub fn parse(&mut self, source: &str) {
        self.spans.clear();
        if !self.has_highlighting() {
            self.tree = None;
            return;
        }

        self.tree = self.parser.parse(source, None);
        if let Some(tree) = &self.tree {
            let mut cursor = tree.walk();
            Self::collect_spans(&mut cursor, source.as_bytes(), &mut self.spans);
        }
        log::trace!("colourised {} tokens", self.spans.len());
    }

    /// Walks the tree, styling the outermost node of each token. Styled
    /// nodes are not descended into, so spans never overlap.
    fn collect_spans(cursor: &mut TreeCursor, source: &[u8], spans: &mut Vec<HighlightSpan>) {
        loop {
            let node = cursor.node();

            match Self::node_style(&node, source) {
                Some(style) if !node.is_missing() && node.end_byte() > node.start_byte() => {
                    spans.push(HighlightSpan::new(node.start_byte(), node.end_byte(), style));
                }
                Some(_) => {}
                None => {
                    if cursor.goto_first_child() {
                        Self::collect_spans(cursor, source, spans);
                        cursor.goto_parent();
                    }
                }
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    fn node_style(node: &Node, source: &[u8]) -> Option<TokenStyle> {
        let kind = node.kind();
        match kind {
            "comment" => Some(TokenStyle::Comment),
            "string_literal" | "raw_string_literal" | "system_lib_string" => {
                Some(TokenStyle::String)
            }
            "char_literal" => Some(TokenStyle::Char),
            "number_literal" => Some(TokenStyle::Number),
            "primitive_type" | "type_identifier" => {
                let text = node.utf8_text(source).ok()?;
                Some(keyword_style(text).unwrap_or(TokenStyle::Type))
            }
            _ if !node.is_named() && kind.starts_with('#') => Some(TokenStyle::Preprocessor),
            _ if !node.is_named() => keyword_style(kind),
            _ => None,
        }
    }

    /// Returns the token spans from the last parse, ordered by start byte.
    pub fn spans(&self) -> &[HighlightSpan] {
        &self.spans
    }

    /// Returns the style at a byte offset.
    pub fn style_at(&self, byte: usize) -> TokenStyle {
        let idx = self.spans.partition_point(|span| span.end_byte <= byte);
        match self.spans.get(idx) {
            Some(span) if span.contains(byte) => span.style,
            _ => TokenStyle::Default,
        }
    }

    /// Returns the text colour at a byte offset.
    pub fn color_at(&self, byte: usize) -> Color {
        self.theme.color(self.style_at(byte))
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn keyword_style(word: &str) -> Option<TokenStyle> {
    if KEYWORDS.contains(&word) {
        Some(TokenStyle::Keyword)
    } else if SECONDARY_KEYWORDS.contains(&word) {
        Some(TokenStyle::SecondaryKeyword)
    } else {
        None
    }
}
