//! Caret and selection handling.

use crate::buffer::TextBuffer;

/// Represents a position in the buffer as (line, column).
/// Both are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A text selection with an anchor and a caret position.
/// When anchor == cursor, there is no active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// The anchor point (where selection started).
    pub anchor: usize,
    /// The caret position (where selection ends).
    pub cursor: usize,
}

impl Selection {
    /// Creates a new selection at the given position (no active selection).
    pub fn new(pos: usize) -> Self {
        Self {
            anchor: pos,
            cursor: pos,
        }
    }

    /// Creates a selection from anchor to cursor.
    pub fn with_range(anchor: usize, cursor: usize) -> Self {
        Self { anchor, cursor }
    }

    /// Returns true if there's an active selection (anchor != cursor).
    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Returns the start and end of the selection (ordered).
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.cursor {
            (self.anchor, self.cursor)
        } else {
            (self.cursor, self.anchor)
        }
    }

    /// Returns the selected range, or None if no selection.
    pub fn selected_range(&self) -> Option<(usize, usize)> {
        if self.has_selection() {
            Some(self.range())
        } else {
            None
        }
    }

    /// Collapses the selection to the caret position.
    pub fn collapse(&mut self) {
        self.anchor = self.cursor;
    }

    /// Sets the caret position, optionally extending the selection.
    pub fn set_cursor(&mut self, pos: usize, extend: bool) {
        self.cursor = pos;
        if !extend {
            self.anchor = pos;
        }
    }
}

/// Caret that moves relative to a buffer.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    /// Current selection (includes the caret position).
    pub selection: Selection,
    /// Preferred column for vertical movement.
    preferred_col: Option<usize>,
}

impl Cursor {
    /// Creates a new caret at position 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the caret position (character index).
    pub fn position(&self) -> usize {
        self.selection.cursor
    }

    /// Sets the caret position.
    pub fn set_position(&mut self, pos: usize, extend: bool) {
        self.selection.set_cursor(pos, extend);
        self.preferred_col = None;
    }

    /// Returns true if there's an active selection.
    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Returns the selected range if any.
    pub fn selected_range(&self) -> Option<(usize, usize)> {
        self.selection.selected_range()
    }

    /// Moves the caret left by one character.
    pub fn move_left(&mut self, extend: bool) {
        let pos = self.selection.cursor;
        if pos > 0 {
            self.selection.set_cursor(pos - 1, extend);
        } else if !extend {
            self.selection.collapse();
        }
        self.preferred_col = None;
    }

    /// Moves the caret right by one character.
    pub fn move_right(&mut self, buffer: &TextBuffer, extend: bool) {
        let pos = self.selection.cursor;
        if pos < buffer.len_chars() {
            self.selection.set_cursor(pos + 1, extend);
        } else if !extend {
            self.selection.collapse();
        }
        self.preferred_col = None;
    }

    /// Moves the caret up by one line, keeping the preferred column.
    pub fn move_up(&mut self, buffer: &TextBuffer, extend: bool) {
        let (line, col) = buffer.char_to_line_col(self.selection.cursor);
        let target_col = *self.preferred_col.get_or_insert(col);

        if line > 0 {
            let new_pos = buffer.line_col_to_char(line - 1, target_col);
            self.selection.set_cursor(new_pos, extend);
        } else {
            self.selection.set_cursor(0, extend);
            self.preferred_col = None;
        }
    }

    /// Moves the caret down by one line, keeping the preferred column.
    pub fn move_down(&mut self, buffer: &TextBuffer, extend: bool) {
        let (line, col) = buffer.char_to_line_col(self.selection.cursor);
        let target_col = *self.preferred_col.get_or_insert(col);

        if line + 1 < buffer.len_lines() {
            let new_pos = buffer.line_col_to_char(line + 1, target_col);
            self.selection.set_cursor(new_pos, extend);
        } else {
            self.selection.set_cursor(buffer.len_chars(), extend);
            self.preferred_col = None;
        }
    }

    /// Moves the caret to the start of the current line.
    pub fn move_to_line_start(&mut self, buffer: &TextBuffer, extend: bool) {
        let line = buffer.line_of_char(self.selection.cursor);
        self.selection.set_cursor(buffer.line_start(line), extend);
        self.preferred_col = None;
    }

    /// Moves the caret to the end of the current line.
    pub fn move_to_line_end(&mut self, buffer: &TextBuffer, extend: bool) {
        let line = buffer.line_of_char(self.selection.cursor);
        self.selection.set_cursor(buffer.line_end(line), extend);
        self.preferred_col = None;
    }

    /// Clamps the caret and anchor to valid buffer bounds.
    pub fn clamp_to_buffer(&mut self, buffer: &TextBuffer) {
        let max = buffer.len_chars();
        self.selection.cursor = self.selection.cursor.min(max);
        self.selection.anchor = self.selection.anchor.min(max);
    }
}
