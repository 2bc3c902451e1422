//! Lexical colourising for C++ using tree-sitter.

mod highlighter;
mod language;
mod theme;

pub use highlighter::{HighlightSpan, SyntaxHighlighter, KEYWORDS, SECONDARY_KEYWORDS};
pub use language::Language;
pub use theme::{rgb, rgba, Color, IndicatorShape, IndicatorStyle, Theme, TokenStyle};
