//! Keystroke macro recording and playback.
//!
//! Recording is observational: the session applies every keystroke to the
//! buffer as usual and then hands it to [`MacroRecorder::observe`]. Only
//! printable characters are captured, so playback reproduces typed text but
//! not cursor movement, deletions or line breaks.

use crate::keys::KeyEvent;

/// Recorder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
}

/// Result of playing a macro into a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    /// The text after insertion.
    pub text: String,
    /// The inserted text.
    pub inserted: String,
    /// Caret character index after insertion.
    pub caret: usize,
}

/// Captures printable keystrokes and replays them.
#[derive(Debug, Clone, Default)]
pub struct MacroRecorder {
    state: RecorderState,
    capture: Vec<char>,
}

impl MacroRecorder {
    /// Creates an idle recorder with an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the previous capture and starts recording.
    pub fn start(&mut self) {
        self.capture.clear();
        self.state = RecorderState::Recording;
    }

    /// Stops recording and keeps the capture.
    pub fn stop(&mut self) {
        self.state = RecorderState::Idle;
    }

    /// Returns the recorder state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Returns true while recording.
    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Returns the captured characters in keystroke order.
    pub fn capture(&self) -> &[char] {
        &self.capture
    }

    /// Records a keystroke that has already been applied.
    /// Returns true if it was captured.
    pub fn observe(&mut self, event: &KeyEvent) -> bool {
        if !self.is_recording() {
            return false;
        }
        match event.printable_char() {
            Some(ch) => {
                self.capture.push(ch);
                true
            }
            None => false,
        }
    }

    /// Returns the text a replay inserts, or `None` if nothing is captured.
    pub fn replay_text(&self) -> Option<String> {
        if self.capture.is_empty() {
            None
        } else {
            Some(self.capture.iter().collect())
        }
    }

    /// Inserts the capture into `text` at character index `caret`.
    /// Returns `None` when the capture is empty.
    pub fn play(&self, text: &str, caret: usize) -> Option<Playback> {
        let inserted = self.replay_text()?;
        let byte_idx = text
            .char_indices()
            .nth(caret)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        let caret = text[..byte_idx].chars().count() + inserted.chars().count();

        let mut result = String::with_capacity(text.len() + inserted.len());
        result.push_str(&text[..byte_idx]);
        result.push_str(&inserted);
        result.push_str(&text[byte_idx..]);

        Some(Playback {
            text: result,
            inserted,
            caret,
        })
    }
}
