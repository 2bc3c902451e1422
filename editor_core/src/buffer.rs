//! Text buffer implementation using ropey.

use ropey::Rope;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// A text buffer backed by a rope data structure.
///
/// All positions are character indices unless a method says otherwise.
/// The annotation engine works in byte offsets, so the buffer also offers
/// conversions between the two.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Creates a text buffer from a string.
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Loads a text buffer from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let rope = Rope::from_reader(reader)?;
        Ok(Self { rope })
    }

    /// Saves the buffer to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.rope.write_to(&mut writer)?;
        Ok(())
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the total number of bytes in the buffer.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns the total number of lines in the buffer.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Inserts a string at the given character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let idx = char_idx.min(self.len_chars());
        self.rope.insert(idx, text);
    }

    /// Removes text in the given character range.
    pub fn remove(&mut self, start: usize, end: usize) {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Returns the character at the given index, if it exists.
    pub fn char_at(&self, char_idx: usize) -> Option<char> {
        if char_idx < self.len_chars() {
            Some(self.rope.char(char_idx))
        } else {
            None
        }
    }

    /// Returns the text in the given character range.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars()).max(start);
        self.rope.slice(start..end).to_string()
    }

    /// Converts a character index to a byte offset.
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        self.rope.char_to_byte(char_idx.min(self.len_chars()))
    }

    /// Converts a byte offset to a character index.
    /// Offsets inside a multi-byte character resolve to that character.
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        self.rope.byte_to_char(byte_idx.min(self.len_bytes()))
    }

    /// Returns the line containing the given character index.
    pub fn line_of_char(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.len_chars()))
    }

    /// Converts a character index to a (line, column) position.
    /// Both line and column are 0-indexed.
    pub fn char_to_line_col(&self, char_idx: usize) -> (usize, usize) {
        let char_idx = char_idx.min(self.len_chars());
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        let col = char_idx - line_start;
        (line, col)
    }

    /// Converts a (line, column) position to a character index.
    /// Both line and column are 0-indexed.
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        if line >= self.len_lines() {
            return self.len_chars();
        }
        let line_start = self.rope.line_to_char(line);
        let line_len = self.line_len_chars(line);
        line_start + col.min(line_len)
    }

    /// Returns the length of a line in characters (excluding the line break).
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            return 0;
        }
        let line_slice = self.rope.line(line);
        let mut len = line_slice.len_chars();
        if len > 0 && line_slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line_slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Returns the character index of the start of a line.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line)
        }
    }

    /// Returns the character index of the end of a line (before the line break).
    pub fn line_end(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line) + self.line_len_chars(line)
        }
    }

    /// Returns the line at the given index as a string, without its line break.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.len_lines() {
            None
        } else {
            let start = self.line_start(line);
            Some(self.slice(start, start + self.line_len_chars(line)))
        }
    }

    /// Returns the indentation of a line measured in columns.
    /// Tabs advance to the next multiple of `tab_width`.
    pub fn line_indentation(&self, line: usize, tab_width: usize) -> usize {
        let tab_width = tab_width.max(1);
        let mut columns = 0;
        if line >= self.len_lines() {
            return columns;
        }
        for ch in self.rope.line(line).chars() {
            match ch {
                ' ' => columns += 1,
                '\t' => columns = (columns / tab_width + 1) * tab_width,
                _ => break,
            }
        }
        columns
    }

    /// Returns the entire buffer as a string.
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!(buf.len_lines(), 1); // Empty buffer has 1 line
    }

    #[test]
    fn test_from_str() {
        let buf = TextBuffer::from_str("int a;\nint b;");
        assert_eq!(buf.len_chars(), 13);
        assert_eq!(buf.len_lines(), 2);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut buf = TextBuffer::new();
        buf.insert(0, "cout");
        buf.insert(4, " << x;");
        assert_eq!(buf.to_string(), "cout << x;");

        buf.remove(4, 10);
        assert_eq!(buf.to_string(), "cout");
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut buf = TextBuffer::from_str("ab");
        buf.insert(99, "c");
        assert_eq!(buf.to_string(), "abc");
    }

    #[test]
    fn test_line_operations() {
        let buf = TextBuffer::from_str("line1\r\nline2\nline3");
        assert_eq!(buf.len_lines(), 3);
        assert_eq!(buf.line(0), Some("line1".to_string()));
        assert_eq!(buf.line(1), Some("line2".to_string()));
        assert_eq!(buf.line(2), Some("line3".to_string()));
        assert_eq!(buf.line(3), None);
        assert_eq!(buf.line_end(0), 5);
    }

    #[test]
    fn test_char_to_line_col() {
        let buf = TextBuffer::from_str("abc\ndefgh");
        assert_eq!(buf.char_to_line_col(0), (0, 0));
        assert_eq!(buf.char_to_line_col(3), (0, 3)); // newline char
        assert_eq!(buf.char_to_line_col(4), (1, 0));
        assert_eq!(buf.char_to_line_col(6), (1, 2));
        assert_eq!(buf.line_col_to_char(1, 2), 6);
        assert_eq!(buf.line_col_to_char(0, 99), 3);
    }

    #[test]
    fn test_byte_char_conversion() {
        let buf = TextBuffer::from_str("é = 1;");
        assert_eq!(buf.char_to_byte(1), 2);
        assert_eq!(buf.byte_to_char(2), 1);
        assert_eq!(buf.byte_to_char(100), buf.len_chars());
    }

    #[test]
    fn test_line_indentation() {
        let buf = TextBuffer::from_str("    int a;\n\tint b;\n  \tx\nnone");
        assert_eq!(buf.line_indentation(0, 4), 4);
        assert_eq!(buf.line_indentation(1, 4), 4);
        assert_eq!(buf.line_indentation(2, 4), 4);
        assert_eq!(buf.line_indentation(3, 4), 0);
        assert_eq!(buf.line_indentation(9, 4), 0);
    }
}
