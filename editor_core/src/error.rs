//! Error types for fallible editor operations.
//!
//! The annotation engine and the macro recorder never fail; only the edges
//! that touch files or external documents do.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by configuration loading and the plugin catalog contract.
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no plugin selected")]
    NoSelection,

    #[error("plugin name {0:?} cannot be used as a file name")]
    InvalidPluginName(String),

    #[error("unrecognized download event tag: {0}")]
    InvalidEventTag(String),
}

pub type Result<T> = std::result::Result<T, ScribeError>;
