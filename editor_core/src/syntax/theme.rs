//! Colours for lexical styles and annotation indicators.

use crate::annotate::Category;
use std::collections::HashMap;

/// Token style categories for C++ colourising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenStyle {
    /// Structural keywords (class, if, return, using, ...)
    Keyword,
    /// Access, type and declaration keywords (public, const, int, namespace, ...)
    SecondaryKeyword,
    /// User type names
    Type,
    /// String literals
    String,
    /// Character literals
    Char,
    /// Numeric literals
    Number,
    /// Comments (line and block)
    Comment,
    /// Preprocessor directives
    Preprocessor,
    /// Default text (no special highlighting)
    Default,
}

/// RGBA color represented as [r, g, b, a] with values 0.0-1.0.
pub type Color = [f32; 4];

/// Builds an opaque colour from 8-bit channels.
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    rgba(r, g, b, 255)
}

/// Builds a colour from 8-bit channels.
pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    [
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    ]
}

/// How an annotation layer is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorShape {
    /// Translucent box behind the text.
    RoundBox,
    /// Wavy underline.
    Squiggle,
}

/// Drawing style of one annotation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorStyle {
    pub shape: IndicatorShape,
    pub color: Color,
}

/// A colour scheme for lexical styles and indicators.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name.
    pub name: String,
    /// Background color.
    pub background: Color,
    /// Default text color.
    pub foreground: Color,
    colors: HashMap<TokenStyle, Color>,
    indicators: HashMap<Category, IndicatorStyle>,
}

impl Theme {
    /// Creates a theme with no style colours set.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            background: rgb(255, 255, 255),
            foreground: rgb(0, 0, 0),
            colors: HashMap::new(),
            indicators: HashMap::new(),
        }
    }

    /// Sets the color for a token style.
    pub fn set_color(&mut self, style: TokenStyle, color: Color) {
        self.colors.insert(style, color);
    }

    /// Gets the color for a token style, falling back to foreground.
    pub fn color(&self, style: TokenStyle) -> Color {
        self.colors.get(&style).copied().unwrap_or(self.foreground)
    }

    /// Sets how a category's layer is drawn.
    pub fn set_indicator(&mut self, category: Category, style: IndicatorStyle) {
        self.indicators.insert(category, style);
    }

    /// Returns how a category's layer is drawn.
    pub fn indicator(&self, category: Category) -> Option<IndicatorStyle> {
        self.indicators.get(&category).copied()
    }

    /// Light theme with Xcode-like colours.
    pub fn xcode() -> Self {
        let mut theme = Self::new("Xcode");

        theme.set_color(TokenStyle::Keyword, rgb(21, 101, 192));
        theme.set_color(TokenStyle::SecondaryKeyword, rgb(255, 45, 85));
        theme.set_color(TokenStyle::Type, rgb(21, 101, 192));
        theme.set_color(TokenStyle::String, rgb(255, 200, 64));
        theme.set_color(TokenStyle::Char, rgb(255, 200, 64));
        theme.set_color(TokenStyle::Number, rgb(173, 216, 230));
        theme.set_color(TokenStyle::Comment, rgb(150, 150, 150));
        theme.set_color(TokenStyle::Preprocessor, rgb(255, 45, 85));
        theme.set_color(TokenStyle::Default, theme.foreground);

        theme.set_indicator(
            Category::Variable,
            IndicatorStyle {
                shape: IndicatorShape::RoundBox,
                color: rgba(255, 255, 128, 80),
            },
        );
        theme.set_indicator(
            Category::Call,
            IndicatorStyle {
                shape: IndicatorShape::RoundBox,
                color: rgba(173, 216, 230, 80),
            },
        );
        theme.set_indicator(
            Category::Error,
            IndicatorStyle {
                shape: IndicatorShape::Squiggle,
                color: rgb(255, 0, 0),
            },
        );
        theme.set_indicator(
            Category::Find,
            IndicatorStyle {
                shape: IndicatorShape::RoundBox,
                color: rgba(255, 255, 0, 80),
            },
        );

        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::xcode()
    }
}
