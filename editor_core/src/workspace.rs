//! Tabbed sessions.
//!
//! A [`Workspace`] keeps one [`EditorSession`] per tab. File commands act on
//! the active tab. Every tab owns its buffer, macro recorder and painted
//! layers, so recording or annotating in one tab never touches another.

use crate::config::EditorConfig;
use crate::session::EditorSession;
use std::io;
use std::path::{Path, PathBuf};

/// Stable identifier of a tab. Ids are never reused.
pub type TabId = usize;

/// Title of a tab with no file.
pub const UNTITLED: &str = "Untitled";

/// Display data for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    /// File name, or [`UNTITLED`].
    pub title: String,
    pub path: Option<PathBuf>,
    pub is_modified: bool,
}

struct Tab {
    id: TabId,
    session: EditorSession,
}

impl Tab {
    fn title(&self) -> String {
        self.session
            .file_path()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }
}

/// Open tabs in display order plus the active one.
pub struct Workspace {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: TabId,
    /// Configuration handed to new tabs.
    config: EditorConfig,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Workspace {
    /// Creates a workspace with no tabs.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 0,
            config,
        }
    }

    fn push(&mut self, session: EditorSession) -> TabId {
        let id = self.next_id;
        self.next_id += 1;
        self.tabs.push(Tab { id, session });
        self.active = Some(id);
        id
    }

    fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    // ==================== Tabs ====================

    /// Opens an empty untitled tab and makes it active.
    pub fn new_tab(&mut self) -> TabId {
        let id = self.push(EditorSession::new(self.config.clone()));
        log::debug!("opened untitled tab {}", id);
        id
    }

    /// Opens `path` in a new active tab. A file that is already open is
    /// activated instead of loaded twice.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<TabId> {
        let path = path.as_ref();
        if let Some(id) = self.find_by_path(path) {
            self.active = Some(id);
            return Ok(id);
        }

        let mut session = EditorSession::new(self.config.clone());
        session.open_file(path)?;
        Ok(self.push(session))
    }

    fn find_by_path(&self, path: &Path) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|tab| tab.session.file_path() == Some(path))
            .map(|tab| tab.id)
    }

    /// Closes a tab without checking for unsaved changes. The first
    /// remaining tab becomes active if the closed one was.
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.tabs.remove(idx);
        if self.active == Some(id) {
            self.active = self.tabs.first().map(|tab| tab.id);
        }
        true
    }

    /// Closes the active tab and returns its id.
    pub fn close_active(&mut self) -> Option<TabId> {
        let id = self.active?;
        self.close_tab(id).then_some(id)
    }

    /// Activates a tab. Returns false for unknown ids.
    pub fn set_active(&mut self, id: TabId) -> bool {
        if self.position(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Activates the tab at a 0-based display index.
    pub fn switch_to_tab(&mut self, index: usize) {
        if let Some(tab) = self.tabs.get(index) {
            self.active = Some(tab.id);
        }
    }

    /// Activates the next tab, wrapping around.
    pub fn next_tab(&mut self) {
        if let Some(idx) = self.active_index() {
            self.switch_to_tab((idx + 1) % self.tabs.len());
        }
    }

    /// Activates the previous tab, wrapping around.
    pub fn prev_tab(&mut self) {
        if let Some(idx) = self.active_index() {
            let len = self.tabs.len();
            self.switch_to_tab((idx + len - 1) % len);
        }
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    /// Display index of the active tab.
    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.position(id))
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Returns display data for every tab, in order.
    pub fn tabs(&self) -> Vec<TabInfo> {
        self.tabs
            .iter()
            .map(|tab| TabInfo {
                id: tab.id,
                title: tab.title(),
                path: tab.session.file_path().map(Path::to_path_buf),
                is_modified: tab.session.is_modified(),
            })
            .collect()
    }

    // ==================== Sessions ====================

    pub fn session(&self, id: TabId) -> Option<&EditorSession> {
        self.tabs
            .iter()
            .find(|tab| tab.id == id)
            .map(|tab| &tab.session)
    }

    pub fn session_mut(&mut self, id: TabId) -> Option<&mut EditorSession> {
        self.tabs
            .iter_mut()
            .find(|tab| tab.id == id)
            .map(|tab| &mut tab.session)
    }

    /// Returns the session of the active tab.
    pub fn active_session(&self) -> Option<&EditorSession> {
        self.session(self.active?)
    }

    /// Returns the session of the active tab mutably.
    pub fn active_session_mut(&mut self) -> Option<&mut EditorSession> {
        let id = self.active?;
        self.session_mut(id)
    }

    /// Replaces the configuration of the workspace and every open tab.
    pub fn set_config(&mut self, config: EditorConfig) {
        for tab in &mut self.tabs {
            tab.session.set_config(config.clone());
        }
        self.config = config;
    }

    // ==================== Saving ====================

    /// Returns true if any tab has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.tabs.iter().any(|tab| tab.session.is_modified())
    }

    /// Ids of tabs with unsaved changes, in display order.
    pub fn modified_tabs(&self) -> Vec<TabId> {
        self.tabs
            .iter()
            .filter(|tab| tab.session.is_modified())
            .map(|tab| tab.id)
            .collect()
    }

    /// Saves the active tab to its file. Fails for untitled tabs, which
    /// need [`Workspace::save_active_as`].
    pub fn save_active(&mut self) -> io::Result<()> {
        self.active_session_mut()
            .ok_or_else(no_active_tab)?
            .save()
    }

    /// Saves the active tab under a new path. The tab title follows the new
    /// file name.
    pub fn save_active_as<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        self.active_session_mut()
            .ok_or_else(no_active_tab)?
            .save_as(path)
    }
}

fn no_active_tab() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "no active tab")
}
