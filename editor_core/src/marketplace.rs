//! Plugin marketplace data contract.
//!
//! The host fetches a JSON catalog, lets the user pick an entry, downloads
//! it on a worker and reports completion back to the UI thread with a
//! tagged string. This module covers everything except the network and the
//! thread: catalog parsing, selection, the install location and the
//! completion tag.

use crate::error::{Result, ScribeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory plugins are installed into, relative to the working directory.
pub const PLUGIN_DIR: &str = "plugins";

const SUCCESS_TAG: &str = "DOWNLOAD_SUCCESS:";
const FAILED_TAG: &str = "DOWNLOAD_FAILED";

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    pub version: String,
    pub description: String,
    pub download_url: String,
}

/// Parses a catalog document: a JSON array of entries.
pub fn parse_catalog(json: &str) -> Result<Vec<PluginEntry>> {
    let entries: Vec<PluginEntry> =
        serde_json::from_str(json).map_err(|source| ScribeError::Json {
            context: "plugin catalog".to_string(),
            source,
        })?;
    log::debug!("catalog lists {} plugins", entries.len());
    Ok(entries)
}

/// Returns the selected entry. `None` means nothing is selected.
pub fn select_entry(entries: &[PluginEntry], selected: Option<usize>) -> Result<&PluginEntry> {
    selected
        .and_then(|idx| entries.get(idx))
        .ok_or(ScribeError::NoSelection)
}

/// Returns where a downloaded plugin is written:
/// `plugins/<name>.<library extension>`.
pub fn install_path(entry: &PluginEntry) -> Result<PathBuf> {
    let name = entry.name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ScribeError::InvalidPluginName(entry.name.clone()));
    }
    Ok(Path::new(PLUGIN_DIR).join(format!("{}.{}", name, std::env::consts::DLL_EXTENSION)))
}

/// Completion message posted by the download worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// The plugin was written to this path.
    Success(PathBuf),
    Failed,
}

impl DownloadEvent {
    /// Message shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Success(path) => format!("Plugin installed to {}", path.display()),
            Self::Failed => "Failed to download plugin.".to_string(),
        }
    }
}

impl fmt::Display for DownloadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(path) => write!(f, "{}{}", SUCCESS_TAG, path.display()),
            Self::Failed => f.write_str(FAILED_TAG),
        }
    }
}

impl FromStr for DownloadEvent {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self> {
        if s == FAILED_TAG {
            Ok(Self::Failed)
        } else if let Some(path) = s.strip_prefix(SUCCESS_TAG) {
            Ok(Self::Success(PathBuf::from(path)))
        } else {
            Err(ScribeError::InvalidEventTag(s.to_string()))
        }
    }
}
