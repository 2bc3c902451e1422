//! Caret-local editing helpers: paired delimiters, smart newlines, comment
//! toggling and brace matching.

use crate::buffer::TextBuffer;
use crate::config::EditorConfig;
use crate::cursor::Selection;

/// Text to insert at the caret and where the caret lands inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    /// Caret position in characters from the start of `text`.
    pub caret_offset: usize,
}

impl Insertion {
    /// Plain insertion with the caret after the text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret_offset = text.chars().count();
        Self { text, caret_offset }
    }
}

/// Returns the closing half for an auto-closed delimiter.
pub fn closing_pair(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '{' => Some('}'),
        '[' => Some(']'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Inserts both halves of a pair with the caret between them.
pub fn auto_close(open: char) -> Option<Insertion> {
    closing_pair(open).map(|close| Insertion {
        text: [open, close].iter().collect(),
        caret_offset: 1,
    })
}

/// Builds the insertion for Enter at `caret`.
///
/// The new line copies the current line's indentation. After `{` an extra
/// level is added and a line at the current indentation follows, so the
/// closing brace ends up aligned with the opening line.
pub fn smart_newline(buffer: &TextBuffer, caret: usize, config: &EditorConfig) -> Insertion {
    let line = buffer.line_of_char(caret);
    let columns = buffer.line_indentation(line, config.indent_width);
    let indent = config.indent_text(columns);

    if caret > 0 && buffer.char_at(caret - 1) == Some('{') {
        let inner = config.indent_text(columns + config.indent_width);
        let caret_offset = 1 + inner.chars().count();
        Insertion {
            text: format!("\n{}\n{}", inner, indent),
            caret_offset,
        }
    } else {
        Insertion::plain(format!("\n{}", indent))
    }
}

/// One line changed by comment toggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit {
    /// Marker inserted at character index `at`.
    Commented { line: usize, at: usize },
    /// Marker removed from character index `at`.
    Uncommented { line: usize, at: usize },
}

/// Toggles `marker` at the start of every line touched by `selection`, or
/// of the caret line when nothing is selected.
///
/// Lines starting with the marker lose it, other lines gain it. Edits are
/// returned top-down with positions in the text before toggling.
pub fn toggle_line_comments(
    buffer: &mut TextBuffer,
    selection: Selection,
    marker: &str,
) -> Vec<LineEdit> {
    if marker.is_empty() {
        return Vec::new();
    }
    let (start, end) = selection.range();
    let first = buffer.line_of_char(start);
    let last = buffer.line_of_char(end);
    let marker_len = marker.chars().count();

    let mut edits: Vec<LineEdit> = (first..=last)
        .map(|line| {
            let at = buffer.line_start(line);
            let commented = buffer
                .line(line)
                .map(|text| text.starts_with(marker))
                .unwrap_or(false);
            if commented {
                LineEdit::Uncommented { line, at }
            } else {
                LineEdit::Commented { line, at }
            }
        })
        .collect();

    // Bottom-up so earlier positions stay valid.
    for edit in edits.iter().rev() {
        match *edit {
            LineEdit::Commented { at, .. } => buffer.insert(at, marker),
            LineEdit::Uncommented { at, .. } => buffer.remove(at, at + marker_len),
        }
    }

    edits.sort_by_key(|edit| match *edit {
        LineEdit::Commented { line, .. } | LineEdit::Uncommented { line, .. } => line,
    });
    edits
}

/// Maps a character index from before a comment toggle to after it.
pub fn shift_offset(offset: usize, edits: &[LineEdit], marker_len: usize) -> usize {
    let mut shifted = offset;
    for edit in edits {
        match *edit {
            LineEdit::Commented { at, .. } if at <= offset => shifted += marker_len,
            LineEdit::Uncommented { at, .. } if at < offset => {
                shifted -= (offset - at).min(marker_len);
            }
            _ => {}
        }
    }
    shifted
}

/// Outcome of brace matching at the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceMatch {
    /// The brace before the caret and its partner.
    Matched { brace: usize, partner: usize },
    /// The brace before the caret has no partner.
    Unmatched { brace: usize },
}

fn brace_partner(ch: char) -> Option<(char, bool)> {
    match ch {
        '(' => Some((')', true)),
        '[' => Some((']', true)),
        '{' => Some(('}', true)),
        ')' => Some(('(', false)),
        ']' => Some(('[', false)),
        '}' => Some(('{', false)),
        _ => None,
    }
}

/// Matches the brace immediately before `caret`, honoring nesting.
///
/// Returns `None` if that character is not one of `()[]{}`. Braces inside
/// strings and comments are counted like any other.
pub fn brace_match(buffer: &TextBuffer, caret: usize) -> Option<BraceMatch> {
    if caret == 0 {
        return None;
    }
    let brace = caret - 1;
    let ch = buffer.char_at(brace)?;
    let (partner_ch, forward) = brace_partner(ch)?;

    let chars: Vec<char> = buffer.to_string().chars().collect();
    let mut depth = 0usize;
    let partner = if forward {
        chars
            .iter()
            .enumerate()
            .skip(brace + 1)
            .find(|&(_, &c)| step_depth(c, ch, partner_ch, &mut depth))
            .map(|(idx, _)| idx)
    } else {
        chars[..brace]
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &c)| step_depth(c, ch, partner_ch, &mut depth))
            .map(|(idx, _)| idx)
    };

    Some(match partner {
        Some(partner) => BraceMatch::Matched { brace, partner },
        None => BraceMatch::Unmatched { brace },
    })
}

/// Updates nesting depth; returns true when `c` closes the starting brace.
fn step_depth(c: char, same: char, partner: char, depth: &mut usize) -> bool {
    if c == same {
        *depth += 1;
    } else if c == partner {
        if *depth == 0 {
            return true;
        }
        *depth -= 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_close() {
        assert_eq!(
            auto_close('('),
            Some(Insertion {
                text: "()".to_string(),
                caret_offset: 1
            })
        );
        assert_eq!(auto_close('"').map(|i| i.text), Some("\"\"".to_string()));
        assert_eq!(auto_close('a'), None);
        assert_eq!(closing_pair('<'), None);
    }

    #[test]
    fn test_newline_copies_indentation() {
        let buffer = TextBuffer::from_str("    int a;");
        let insertion = smart_newline(&buffer, 10, &EditorConfig::default());
        assert_eq!(insertion, Insertion::plain("\n    "));
    }

    #[test]
    fn test_newline_after_open_brace() {
        let buffer = TextBuffer::from_str("  if (x) {}");
        let insertion = smart_newline(&buffer, 10, &EditorConfig::default());
        assert_eq!(insertion.text, "\n      \n  ");
        assert_eq!(insertion.caret_offset, 7);
    }

    #[test]
    fn test_newline_with_tabs() {
        let buffer = TextBuffer::from_str("\tint main() {");
        let config = EditorConfig {
            use_tabs: true,
            ..EditorConfig::default()
        };
        let insertion = smart_newline(&buffer, buffer.len_chars(), &config);
        assert_eq!(insertion.text, "\n\t\t\n\t");
    }

    #[test]
    fn test_toggle_single_line() {
        let mut buffer = TextBuffer::from_str("int a;\nint b;");
        let edits = toggle_line_comments(&mut buffer, Selection::new(9), "//");
        assert_eq!(edits, vec![LineEdit::Commented { line: 1, at: 7 }]);
        assert_eq!(buffer.to_string(), "int a;\n//int b;");

        toggle_line_comments(&mut buffer, Selection::new(9), "//");
        assert_eq!(buffer.to_string(), "int a;\nint b;");
    }

    #[test]
    fn test_toggle_selection_mixed_lines() {
        let mut buffer = TextBuffer::from_str("//a\nb\n//c\nd");
        let edits = toggle_line_comments(&mut buffer, Selection::with_range(8, 1), "//");
        assert_eq!(edits.len(), 3);
        assert_eq!(buffer.to_string(), "a\n//b\nc\nd");
    }

    #[test]
    fn test_indented_comment_is_not_stripped() {
        let mut buffer = TextBuffer::from_str("  // note");
        toggle_line_comments(&mut buffer, Selection::new(0), "//");
        assert_eq!(buffer.to_string(), "//  // note");
    }

    #[test]
    fn test_shift_offset() {
        let edits = [
            LineEdit::Commented { line: 0, at: 0 },
            LineEdit::Uncommented { line: 1, at: 4 },
        ];
        assert_eq!(shift_offset(2, &edits, 2), 4);
        assert_eq!(shift_offset(5, &edits, 2), 6);
        assert_eq!(shift_offset(8, &edits, 2), 8);
    }

    #[test]
    fn test_brace_match_forward_and_backward() {
        let buffer = TextBuffer::from_str("f(a(b), c)");
        assert_eq!(
            brace_match(&buffer, 2),
            Some(BraceMatch::Matched { brace: 1, partner: 9 })
        );
        assert_eq!(
            brace_match(&buffer, 10),
            Some(BraceMatch::Matched { brace: 9, partner: 1 })
        );
        assert_eq!(
            brace_match(&buffer, 6),
            Some(BraceMatch::Matched { brace: 5, partner: 3 })
        );
    }

    #[test]
    fn test_brace_unmatched_and_non_brace() {
        let buffer = TextBuffer::from_str("{ [ }");
        assert_eq!(
            brace_match(&buffer, 3),
            Some(BraceMatch::Unmatched { brace: 2 })
        );
        assert_eq!(brace_match(&buffer, 2), None);
        assert_eq!(brace_match(&buffer, 0), None);
    }
}
