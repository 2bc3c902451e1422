//! Scribe Core - C++ editing with live heuristic annotations.
//!
//! This crate contains the editing session, the annotation engine and the
//! keystroke macro recorder, without any dependency on windowing or
//! rendering systems. A host feeds keystrokes to [`EditorSession`] and
//! draws the painted indicator layers it exposes. A [`Workspace`] holds one
//! session per tab.

pub mod annotate;
pub mod assist;
pub mod buffer;
pub mod config;
pub mod cursor;
pub mod error;
pub mod keys;
pub mod macros;
pub mod marketplace;
pub mod perf;
pub mod search;
pub mod session;
pub mod syntax;
pub mod workspace;

pub use annotate::{recompute_annotations, AnnotationEngine, Annotations, Category, Span};
pub use buffer::TextBuffer;
pub use config::{AnnotationSettings, EditorConfig};
pub use cursor::{Cursor, Position, Selection};
pub use error::{Result, ScribeError};
pub use keys::{KeyCode, KeyEvent, Modifiers};
pub use macros::{MacroRecorder, Playback, RecorderState};
pub use session::{EditorSession, KeystrokeOutcome};
pub use workspace::{TabId, TabInfo, Workspace};
