//! Keystroke events delivered by the hosting view.

/// Lowest character code treated as printable.
pub const PRINTABLE_MIN: u32 = 32;
/// Highest character code treated as printable.
pub const PRINTABLE_MAX: u32 = 126;

/// A key, independent of any windowing toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character produced by the key.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Escape,
}

/// Modifier keys held during a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub primary: bool,
    pub shift: bool,
    pub alt: bool,
}

/// A single keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates an unmodified keystroke.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::default(),
        }
    }

    /// Creates an unmodified character keystroke.
    pub fn char(ch: char) -> Self {
        Self::new(KeyCode::Char(ch))
    }

    /// Creates a keystroke with the primary modifier held.
    pub fn primary(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers {
                primary: true,
                ..Modifiers::default()
            },
        }
    }

    /// Returns the character if this keystroke types a printable ASCII
    /// character. Chords with the primary modifier are commands, not text.
    pub fn printable_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch)
                if !self.modifiers.primary
                    && (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&(ch as u32)) =>
            {
                Some(ch)
            }
            _ => None,
        }
    }

    /// Returns true if the keystroke is in the printable range.
    pub fn is_printable(&self) -> bool {
        self.printable_char().is_some()
    }
}

/// Splits text into one keystroke per character. Line breaks become
/// [`KeyCode::Enter`] and tabs [`KeyCode::Tab`].
pub fn keystrokes(text: &str) -> Vec<KeyEvent> {
    text.chars()
        .filter(|ch| *ch != '\r')
        .map(|ch| match ch {
            '\n' => KeyEvent::new(KeyCode::Enter),
            '\t' => KeyEvent::new(KeyCode::Tab),
            other => KeyEvent::char(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_range() {
        assert_eq!(KeyEvent::char(' ').printable_char(), Some(' '));
        assert_eq!(KeyEvent::char('~').printable_char(), Some('~'));
        assert!(!KeyEvent::char('\u{7f}').is_printable());
        assert!(!KeyEvent::char('é').is_printable());
        assert!(!KeyEvent::new(KeyCode::Enter).is_printable());
        assert!(!KeyEvent::new(KeyCode::Left).is_printable());
    }

    #[test]
    fn test_primary_chord_is_not_printable() {
        assert!(!KeyEvent::primary(KeyCode::Char('/')).is_printable());
    }

    #[test]
    fn test_keystrokes() {
        let keys = keystrokes("a\r\n\tb");
        assert_eq!(
            keys,
            vec![
                KeyEvent::char('a'),
                KeyEvent::new(KeyCode::Enter),
                KeyEvent::new(KeyCode::Tab),
                KeyEvent::char('b'),
            ]
        );
    }
}
