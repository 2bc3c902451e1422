//! Editor configuration.
//!
//! Settings are plain data loaded from a JSON file. Every field has a
//! default, so a partial file (or none at all) is valid.

use crate::error::{Result, ScribeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Switches for the annotation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    pub variables: bool,
    pub calls: bool,
    pub errors: bool,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            variables: true,
            calls: true,
            errors: true,
        }
    }
}

/// Editing and annotation settings for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Columns per indentation level.
    pub indent_width: usize,
    /// Indent with tabs instead of spaces.
    pub use_tabs: bool,
    /// Insert the closing half of `()`, `{}`, `[]`, `""` and `''`.
    pub auto_close_pairs: bool,
    /// Marker used by comment toggling.
    pub line_comment: String,
    pub annotations: AnnotationSettings,
    /// Annotation passes slower than this are logged as warnings.
    pub slow_pass_threshold_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            use_tabs: false,
            auto_close_pairs: true,
            line_comment: "//".to_string(),
            annotations: AnnotationSettings::default(),
            slow_pass_threshold_ms: 16,
        }
    }
}

impl EditorConfig {
    /// Loads a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScribeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    /// Loads a configuration file, falling back to defaults if it does not
    /// exist. Other failures are still reported.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(content: &str, context: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| ScribeError::Json {
            context: context.to_string(),
            source,
        })
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|source| ScribeError::Json {
            context: path.display().to_string(),
            source,
        })?;
        fs::write(path, content).map_err(|source| ScribeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the text of one indentation level.
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width)
        }
    }

    /// Returns whitespace spanning `columns` columns.
    pub fn indent_text(&self, columns: usize) -> String {
        if self.use_tabs && self.indent_width > 0 {
            let mut text = "\t".repeat(columns / self.indent_width);
            text.push_str(&" ".repeat(columns % self.indent_width));
            text
        } else {
            " ".repeat(columns)
        }
    }
}
