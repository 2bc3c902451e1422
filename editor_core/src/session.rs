//! Editing session.
//!
//! An [`EditorSession`] is what a hosting view talks to. It owns the buffer,
//! caret, macro recorder and painted annotation layers, and has two entry
//! points: [`EditorSession::on_keystroke`] for key handling and
//! [`EditorSession::on_content_changed`], which re-colourises and
//! re-annotates the whole buffer after any edit.

use crate::annotate::{AnnotationEngine, Annotations, Category, IndicatorLayer, SpanCanvas};
use crate::assist::{self, BraceMatch, Insertion};
use crate::buffer::TextBuffer;
use crate::config::EditorConfig;
use crate::cursor::{Cursor, Position, Selection};
use crate::keys::{KeyCode, KeyEvent};
use crate::macros::MacroRecorder;
use crate::perf::AnnotationStats;
use crate::search;
use crate::syntax::{Language, SyntaxHighlighter};
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What a keystroke did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeystrokeOutcome {
    /// The buffer changed and annotations were recomputed.
    pub content_changed: bool,
    /// The keystroke was appended to the macro capture.
    pub recorded: bool,
}

/// Editor state for one open document.
///
/// Note: Does not derive Debug because SyntaxHighlighter contains Parser
/// which doesn't implement Debug.
pub struct EditorSession {
    buffer: TextBuffer,
    cursor: Cursor,
    config: EditorConfig,
    engine: AnnotationEngine,
    canvas: SpanCanvas,
    annotations: Annotations,
    highlighter: SyntaxHighlighter,
    recorder: MacroRecorder,
    stats: AnnotationStats,
    /// Current file path, if any.
    file_path: Option<PathBuf>,
    /// Whether the buffer has unsaved changes.
    modified: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Creates an empty C++ session.
    pub fn new(config: EditorConfig) -> Self {
        let mut session = Self {
            buffer: TextBuffer::new(),
            cursor: Cursor::new(),
            engine: AnnotationEngine::new(config.annotations),
            canvas: SpanCanvas::new(),
            annotations: Annotations::default(),
            highlighter: SyntaxHighlighter::for_language(Language::Cpp),
            recorder: MacroRecorder::new(),
            stats: AnnotationStats::new(Duration::from_millis(config.slow_pass_threshold_ms)),
            file_path: None,
            modified: false,
            config,
        };
        session.on_content_changed();
        session
    }

    /// Creates an unmodified session holding `text`.
    pub fn from_text(text: &str, config: EditorConfig) -> Self {
        let mut session = Self::new(config);
        session.buffer = TextBuffer::from_str(text);
        session.on_content_changed();
        session
    }

    // ==================== Files ====================

    /// Loads a file, replacing the buffer.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        self.buffer = TextBuffer::from_file(path)?;
        self.cursor = Cursor::new();
        self.file_path = Some(path.to_path_buf());
        self.modified = false;

        self.highlighter.set_language(Language::from_path(path));
        self.on_content_changed();

        log::info!(
            "opened {} ({} bytes, {})",
            path.display(),
            self.buffer.len_bytes(),
            self.highlighter.language().name()
        );
        Ok(())
    }

    /// Saves the buffer to the current file path.
    pub fn save(&mut self) -> io::Result<()> {
        if let Some(path) = &self.file_path {
            self.buffer.save_to_file(path)?;
            log::info!("saved {}", path.display());
            self.modified = false;
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::Other, "no file path set"))
        }
    }

    /// Saves the buffer to a new file path.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        self.buffer.save_to_file(path)?;
        log::info!("saved {}", path.display());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Returns the current file path.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns whether the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    // ==================== Content ====================

    /// Returns a reference to the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns the full buffer text.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Replaces the whole buffer and moves the caret to the start.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = TextBuffer::from_str(text);
        self.cursor = Cursor::new();
        self.modified = true;
        self.on_content_changed();
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replaces the configuration. Pass timing restarts with the new
    /// threshold.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.engine.set_settings(config.annotations);
        self.stats = AnnotationStats::new(Duration::from_millis(config.slow_pass_threshold_ms));
        self.config = config;
        self.on_content_changed();
    }

    // ==================== Caret ====================

    /// Returns the caret character index.
    pub fn caret(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the caret as (line, column).
    pub fn caret_position(&self) -> Position {
        let (line, col) = self.buffer.char_to_line_col(self.cursor.position());
        Position::new(line, col)
    }

    /// Moves the caret, clearing any selection.
    pub fn set_caret(&mut self, pos: usize) {
        self.cursor.set_position(pos.min(self.buffer.len_chars()), false);
    }

    /// Selects from `anchor` to `caret`.
    pub fn select(&mut self, anchor: usize, caret: usize) {
        let max = self.buffer.len_chars();
        self.cursor.set_position(anchor.min(max), false);
        self.cursor.set_position(caret.min(max), true);
    }

    /// Returns the current selection.
    pub fn selection(&self) -> Selection {
        self.cursor.selection
    }

    /// Returns the selected text, if any.
    pub fn selected_text(&self) -> Option<String> {
        self.cursor
            .selected_range()
            .map(|(start, end)| self.buffer.slice(start, end))
    }

    // ==================== Editing ====================

    /// Inserts text at the caret, replacing any selection.
    pub fn insert_text(&mut self, text: &str) {
        if self.apply_insertion(Insertion::plain(text)) {
            self.on_content_changed();
        }
    }

    /// Deletes the selection or the character before the caret.
    pub fn delete_backward(&mut self) {
        if self.remove_backward() {
            self.on_content_changed();
        }
    }

    /// Deletes the selection or the character after the caret.
    pub fn delete_forward(&mut self) {
        if self.remove_forward() {
            self.on_content_changed();
        }
    }

    /// Toggles the line comment marker on the caret line or every selected
    /// line.
    pub fn toggle_comment(&mut self) {
        if self.toggle_comment_lines() {
            self.on_content_changed();
        }
    }

    /// Returns the byte ranges of every occurrence of `query` and paints
    /// them into the find layer, replacing the previous search.
    pub fn find_all(&mut self, query: &str) -> Vec<Range<usize>> {
        let matches = search::find_all(&self.text(), query);
        self.canvas.repaint(Category::Find, matches.iter().cloned());
        log::debug!("found {} occurrences of {:?}", matches.len(), query);
        matches
    }

    /// Replaces every occurrence of `query` and returns how many were
    /// replaced.
    pub fn find_replace_all(&mut self, query: &str, replacement: &str) -> usize {
        let result = search::replace_all(&self.text(), query, replacement);
        if result.count > 0 {
            self.buffer = TextBuffer::from_str(&result.text);
            self.cursor.clamp_to_buffer(&self.buffer);
            self.modified = true;
            self.on_content_changed();
        }
        log::info!("replaced {} occurrences of {:?}", result.count, query);
        result.count
    }

    fn apply_insertion(&mut self, insertion: Insertion) -> bool {
        let had_selection = self.delete_selection();
        if insertion.text.is_empty() {
            return had_selection;
        }
        let pos = self.cursor.position();
        self.buffer.insert(pos, &insertion.text);
        self.cursor.set_position(pos + insertion.caret_offset, false);
        self.modified = true;
        true
    }

    fn remove_backward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let pos = self.cursor.position();
        if pos == 0 {
            return false;
        }
        self.buffer.remove(pos - 1, pos);
        self.cursor.set_position(pos - 1, false);
        self.modified = true;
        true
    }

    fn remove_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let pos = self.cursor.position();
        if pos >= self.buffer.len_chars() {
            return false;
        }
        self.buffer.remove(pos, pos + 1);
        self.modified = true;
        true
    }

    /// Deletes the current selection.
    /// Returns true if there was a selection to delete.
    fn delete_selection(&mut self) -> bool {
        if let Some((start, end)) = self.cursor.selected_range() {
            self.buffer.remove(start, end);
            self.cursor.set_position(start, false);
            self.modified = true;
            true
        } else {
            false
        }
    }

    fn toggle_comment_lines(&mut self) -> bool {
        let selection = self.cursor.selection;
        let edits =
            assist::toggle_line_comments(&mut self.buffer, selection, &self.config.line_comment);
        if edits.is_empty() {
            return false;
        }
        let marker_len = self.config.line_comment.chars().count();
        self.cursor.selection = Selection::with_range(
            assist::shift_offset(selection.anchor, &edits, marker_len),
            assist::shift_offset(selection.cursor, &edits, marker_len),
        );
        self.modified = true;
        true
    }

    // ==================== Events ====================

    /// Applies a keystroke, offers it to the macro recorder and, if the
    /// buffer changed, runs one content-change pass.
    pub fn on_keystroke(&mut self, event: KeyEvent) -> KeystrokeOutcome {
        let shift = event.modifiers.shift;
        let changed = match event.code {
            KeyCode::Char('/') if event.modifiers.primary => self.toggle_comment_lines(),
            // Other chords are host commands.
            _ if event.modifiers.primary => false,
            KeyCode::Enter => {
                // Indentation comes from the text left after the selection goes.
                let had_selection = self.delete_selection();
                let insertion =
                    assist::smart_newline(&self.buffer, self.cursor.position(), &self.config);
                self.apply_insertion(insertion) || had_selection
            }
            KeyCode::Tab => self.apply_insertion(Insertion::plain(self.config.indent_unit())),
            KeyCode::Backspace => self.remove_backward(),
            KeyCode::Delete => self.remove_forward(),
            KeyCode::Left => {
                self.cursor.move_left(shift);
                false
            }
            KeyCode::Right => {
                self.cursor.move_right(&self.buffer, shift);
                false
            }
            KeyCode::Up => {
                self.cursor.move_up(&self.buffer, shift);
                false
            }
            KeyCode::Down => {
                self.cursor.move_down(&self.buffer, shift);
                false
            }
            KeyCode::Home => {
                self.cursor.move_to_line_start(&self.buffer, shift);
                false
            }
            KeyCode::End => {
                self.cursor.move_to_line_end(&self.buffer, shift);
                false
            }
            KeyCode::Escape => {
                self.cursor.selection.collapse();
                false
            }
            KeyCode::Char(ch) if ch.is_control() => false,
            KeyCode::Char(ch) => {
                let insertion = self
                    .config
                    .auto_close_pairs
                    .then(|| assist::auto_close(ch))
                    .flatten()
                    .unwrap_or_else(|| Insertion::plain(ch));
                self.apply_insertion(insertion)
            }
        };

        let recorded = self.recorder.observe(&event);
        if changed {
            self.on_content_changed();
        }
        KeystrokeOutcome {
            content_changed: changed,
            recorded,
        }
    }

    /// Re-colourises the buffer, recomputes every annotation and repaints
    /// the indicator layers. Find highlights are dropped.
    pub fn on_content_changed(&mut self) -> &Annotations {
        let start = Instant::now();
        let text = self.buffer.to_string();

        self.highlighter.parse(&text);
        self.annotations = self.engine.recompute(&text);
        self.engine.paint(&self.annotations, &mut self.canvas);
        // Match offsets do not survive an edit.
        self.canvas.layer_mut(Category::Find).clear();

        self.stats.record_pass(start.elapsed(), text.len());
        &self.annotations
    }

    /// Matches the brace before the caret. Hosts call this on every UI
    /// refresh.
    pub fn brace_match(&self) -> Option<BraceMatch> {
        assist::brace_match(&self.buffer, self.cursor.position())
    }

    // ==================== Macros ====================

    /// Starts a new recording, discarding the previous one.
    pub fn start_recording(&mut self) {
        self.recorder.start();
        log::info!("macro recording started");
    }

    /// Stops recording and keeps the capture.
    pub fn stop_recording(&mut self) {
        self.recorder.stop();
        log::info!(
            "macro recording stopped ({} keystrokes)",
            self.recorder.capture().len()
        );
    }

    /// Returns true while recording.
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Inserts the recorded keystrokes at the caret. Returns the inserted
    /// text, or `None` if nothing was recorded.
    pub fn play_macro(&mut self) -> Option<String> {
        let inserted = self.recorder.replay_text()?;
        self.cursor.selection.collapse();
        let pos = self.cursor.position();
        self.buffer.insert(pos, &inserted);
        self.cursor.set_position(pos + inserted.chars().count(), false);
        self.modified = true;
        log::info!("played macro ({} chars)", inserted.chars().count());
        self.on_content_changed();
        Some(inserted)
    }

    /// Returns the macro recorder.
    pub fn recorder(&self) -> &MacroRecorder {
        &self.recorder
    }

    // ==================== Annotations ====================

    /// Returns the annotations from the last content-change pass.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Returns the painted runs of one category.
    pub fn layer(&self, category: Category) -> &IndicatorLayer {
        self.canvas.layer(category)
    }

    /// Returns every painted layer.
    pub fn canvas(&self) -> &SpanCanvas {
        &self.canvas
    }

    /// Returns the annotation pass timings.
    pub fn annotation_stats(&self) -> &AnnotationStats {
        &self.stats
    }

    /// Returns the lexical highlighter.
    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::RuleId;
    use crate::keys::keystrokes;
    use crate::syntax::TokenStyle;

    fn type_keys(session: &mut EditorSession, keys: &[KeyEvent]) {
        for key in keys {
            session.on_keystroke(*key);
        }
    }

    #[test]
    fn test_insert_and_delete() {
        let mut session = EditorSession::default();

        session.insert_text("hello");
        assert_eq!(session.text(), "hello");
        assert_eq!(session.caret(), 5);

        session.delete_backward();
        assert_eq!(session.text(), "hell");

        session.set_caret(0);
        session.delete_forward();
        assert_eq!(session.text(), "ell");
        assert!(session.is_modified());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut session = EditorSession::from_text("int value;", EditorConfig::default());
        session.select(4, 9);
        assert_eq!(session.selected_text().as_deref(), Some("value"));

        session.on_keystroke(KeyEvent::char('x'));
        assert_eq!(session.text(), "int x;");
        assert_eq!(session.caret(), 5);
    }

    #[test]
    fn test_auto_close_pairs() {
        let mut session = EditorSession::default();
        let outcome = session.on_keystroke(KeyEvent::char('('));
        assert!(outcome.content_changed);
        assert_eq!(session.text(), "()");
        assert_eq!(session.caret(), 1);

        let config = EditorConfig {
            auto_close_pairs: false,
            ..EditorConfig::default()
        };
        let mut session = EditorSession::new(config);
        session.on_keystroke(KeyEvent::char('{'));
        assert_eq!(session.text(), "{");
    }

    #[test]
    fn test_enter_after_open_brace() {
        let mut session = EditorSession::from_text("int main() {}", EditorConfig::default());
        session.set_caret(12);
        session.on_keystroke(KeyEvent::new(KeyCode::Enter));
        assert_eq!(session.text(), "int main() {\n    \n}");
        assert_eq!(session.caret(), 17);
        assert_eq!(session.caret_position(), Position::new(1, 4));
    }

    #[test]
    fn test_enter_replaces_selection_before_indenting() {
        let mut session = EditorSession::from_text("if (x) {abc}", EditorConfig::default());
        session.select(8, 11);
        let outcome = session.on_keystroke(KeyEvent::new(KeyCode::Enter));
        assert!(outcome.content_changed);
        assert_eq!(session.text(), "if (x) {\n    \n}");
        assert_eq!(session.caret(), 13);

        let mut session = EditorSession::from_text("        x\ny", EditorConfig::default());
        session.select(11, 0);
        session.on_keystroke(KeyEvent::new(KeyCode::Enter));
        assert_eq!(session.text(), "\n");
        assert_eq!(session.caret(), 1);
    }

    #[test]
    fn test_tab_inserts_indent_unit() {
        let mut session = EditorSession::default();
        session.on_keystroke(KeyEvent::new(KeyCode::Tab));
        assert_eq!(session.text(), "    ");
    }

    #[test]
    fn test_comment_toggle_chord() {
        let mut session = EditorSession::from_text("int a;", EditorConfig::default());
        session.set_caret(3);

        let outcome = session.on_keystroke(KeyEvent::primary(KeyCode::Char('/')));
        assert!(outcome.content_changed);
        assert!(!outcome.recorded);
        assert_eq!(session.text(), "//int a;");
        assert_eq!(session.caret(), 5);

        session.toggle_comment();
        assert_eq!(session.text(), "int a;");
        assert_eq!(session.caret(), 3);
    }

    #[test]
    fn test_other_chords_do_nothing() {
        let mut session = EditorSession::from_text("abc", EditorConfig::default());
        let outcome = session.on_keystroke(KeyEvent::primary(KeyCode::Char('s')));
        assert_eq!(outcome, KeystrokeOutcome::default());
        assert_eq!(session.text(), "abc");
    }

    #[test]
    fn test_macro_round_trip() {
        let mut session = EditorSession::default();
        session.start_recording();
        type_keys(&mut session, &keystrokes("abc"));
        type_keys(
            &mut session,
            &[
                KeyEvent::new(KeyCode::Left),
                KeyEvent::new(KeyCode::Backspace),
            ],
        );
        session.stop_recording();
        assert!(!session.is_recording());
        assert_eq!(session.text(), "ac");

        session.set_caret(2);
        assert_eq!(session.play_macro().as_deref(), Some("abc"));
        assert_eq!(session.text(), "acabc");
        assert_eq!(session.caret(), 5);
    }

    #[test]
    fn test_play_without_recording_is_noop() {
        let mut session = EditorSession::from_text("x", EditorConfig::default());
        assert_eq!(session.play_macro(), None);
        assert_eq!(session.text(), "x");
        assert!(!session.is_modified());
    }

    #[test]
    fn test_keystroke_outcome_reports_recording() {
        let mut session = EditorSession::default();
        session.start_recording();
        let typed = session.on_keystroke(KeyEvent::char('a'));
        assert!(typed.recorded && typed.content_changed);
        let moved = session.on_keystroke(KeyEvent::new(KeyCode::Left));
        assert!(!moved.recorded && !moved.content_changed);
    }

    #[test]
    fn test_repaint_leaves_no_stale_spans() {
        let mut session = EditorSession::from_text("int a;\na = foo(1);", EditorConfig::default());
        assert!(!session.layer(Category::Variable).is_empty());
        assert!(!session.layer(Category::Call).is_empty());

        session.set_text("a = 1;");
        assert!(session.layer(Category::Variable).is_empty());
        assert!(session.layer(Category::Call).is_empty());
        assert!(session.annotations().variable_names.is_empty());
    }

    #[test]
    fn test_using_directive_clears_namespace_findings() {
        let mut session =
            EditorSession::from_text("std::string name;\n", EditorConfig::default());
        assert_eq!(
            session
                .annotations()
                .findings_for(RuleId::MissingNamespaceQualifier)
                .count(),
            1
        );
        assert!(session.layer(Category::Error).is_painted(0));

        session.set_caret(0);
        session.insert_text("using namespace std;\n");
        assert_eq!(
            session
                .annotations()
                .findings_for(RuleId::MissingNamespaceQualifier)
                .count(),
            0
        );
    }

    #[test]
    fn test_find_and_replace_all() {
        let mut session = EditorSession::from_text("int a; int b;", EditorConfig::default());
        assert_eq!(session.find_all("int"), vec![0..3, 7..10]);

        assert_eq!(session.find_replace_all("int", "double"), 2);
        assert_eq!(session.text(), "double a; double b;");
        assert!(session.annotations().variable_names.contains("b"));

        assert_eq!(session.find_replace_all("missing", "x"), 0);
    }

    #[test]
    fn test_find_paints_matches() {
        let mut session = EditorSession::from_text("foo(); foo();", EditorConfig::default());
        session.find_all("foo");
        assert_eq!(session.layer(Category::Find).runs(), &[0..3, 7..10]);
        assert!(session.annotations().spans(Category::Find).is_empty());

        session.find_all("();");
        assert_eq!(session.layer(Category::Find).runs(), &[3..6, 10..13]);

        session.find_all("bar");
        assert!(session.layer(Category::Find).is_empty());

        session.find_all("foo");
        session.insert_text("x");
        assert!(session.layer(Category::Find).is_empty());
    }

    #[test]
    fn test_brace_match_at_caret() {
        let mut session = EditorSession::from_text("f(x)", EditorConfig::default());
        session.set_caret(4);
        assert_eq!(
            session.brace_match(),
            Some(BraceMatch::Matched { brace: 3, partner: 1 })
        );
        session.set_caret(3);
        assert_eq!(session.brace_match(), None);
    }

    #[test]
    fn test_colourising_runs_with_annotation() {
        let mut session = EditorSession::default();
        session.insert_text("int main() { return 0; }");
        assert_eq!(session.highlighter().style_at(13), TokenStyle::Keyword);
        assert!(session.annotation_stats().total_passes() >= 2);
    }

    #[test]
    fn test_disabled_category_paints_nothing() {
        let mut session = EditorSession::from_text("foo();", EditorConfig::default());
        assert!(!session.layer(Category::Call).is_empty());

        let mut config = EditorConfig::default();
        config.annotations.calls = false;
        session.set_config(config);
        assert!(session.layer(Category::Call).is_empty());
    }

    #[test]
    fn test_open_and_save() {
        let path = std::env::temp_dir().join(format!("scribe-session-{}.cpp", std::process::id()));
        std::fs::write(&path, "int x;\n").unwrap();

        let mut session = EditorSession::default();
        session.open_file(&path).unwrap();
        assert!(!session.is_modified());
        assert_eq!(session.file_path(), Some(path.as_path()));
        assert!(session.annotations().variable_names.contains("x"));

        session.set_caret(session.buffer().len_chars());
        session.insert_text("x = 1;\n");
        assert!(session.is_modified());
        session.save().unwrap();
        assert!(!session.is_modified());

        let saved = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(saved, "int x;\nx = 1;\n");
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut session = EditorSession::default();
        assert!(session.save().is_err());
    }
}
