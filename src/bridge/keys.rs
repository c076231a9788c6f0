//! Translation of host key events into the bridged program's key messages.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;

/// Key identity as understood by bridged programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyCode {
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    /// A literal printable character.
    Char(char),
}

/// A key message delivered to a bridged program. Only `alt` survives as a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub code: ForeignKeyCode,
    pub alt: bool,
}

impl ForeignKey {
    pub fn new(code: ForeignKeyCode) -> Self {
        Self { code, alt: false }
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alt {
            f.write_str("alt+")?;
        }
        match self.code {
            ForeignKeyCode::Enter => f.write_str("enter"),
            ForeignKeyCode::Tab => f.write_str("tab"),
            ForeignKeyCode::Backspace => f.write_str("backspace"),
            ForeignKeyCode::Delete => f.write_str("delete"),
            ForeignKeyCode::Escape => f.write_str("esc"),
            ForeignKeyCode::Up => f.write_str("up"),
            ForeignKeyCode::Down => f.write_str("down"),
            ForeignKeyCode::Left => f.write_str("left"),
            ForeignKeyCode::Right => f.write_str("right"),
            ForeignKeyCode::Home => f.write_str("home"),
            ForeignKeyCode::End => f.write_str("end"),
            ForeignKeyCode::PageUp => f.write_str("pgup"),
            ForeignKeyCode::PageDown => f.write_str("pgdown"),
            ForeignKeyCode::Insert => f.write_str("insert"),
            ForeignKeyCode::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Map a terminal key event onto a [`ForeignKey`].
///
/// Special keys outside the fixed table and non-printable characters produce `None`.
pub fn translate_key(key: &KeyEvent) -> Option<ForeignKey> {
    let code = match key.code {
        KeyCode::Enter => ForeignKeyCode::Enter,
        KeyCode::Tab => ForeignKeyCode::Tab,
        KeyCode::Backspace => ForeignKeyCode::Backspace,
        KeyCode::Delete => ForeignKeyCode::Delete,
        KeyCode::Esc => ForeignKeyCode::Escape,
        KeyCode::Up => ForeignKeyCode::Up,
        KeyCode::Down => ForeignKeyCode::Down,
        KeyCode::Left => ForeignKeyCode::Left,
        KeyCode::Right => ForeignKeyCode::Right,
        KeyCode::Home => ForeignKeyCode::Home,
        KeyCode::End => ForeignKeyCode::End,
        KeyCode::PageUp => ForeignKeyCode::PageUp,
        KeyCode::PageDown => ForeignKeyCode::PageDown,
        KeyCode::Insert => ForeignKeyCode::Insert,
        KeyCode::Char(c) if !c.is_control() => ForeignKeyCode::Char(c),
        _ => return None,
    };
    Some(ForeignKey {
        code,
        alt: key.modifiers.contains(KeyModifiers::ALT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_named_keys() {
        let table = [
            (KeyCode::Enter, ForeignKeyCode::Enter),
            (KeyCode::Tab, ForeignKeyCode::Tab),
            (KeyCode::Backspace, ForeignKeyCode::Backspace),
            (KeyCode::Delete, ForeignKeyCode::Delete),
            (KeyCode::Esc, ForeignKeyCode::Escape),
            (KeyCode::Up, ForeignKeyCode::Up),
            (KeyCode::Down, ForeignKeyCode::Down),
            (KeyCode::Left, ForeignKeyCode::Left),
            (KeyCode::Right, ForeignKeyCode::Right),
            (KeyCode::Home, ForeignKeyCode::Home),
            (KeyCode::End, ForeignKeyCode::End),
            (KeyCode::PageUp, ForeignKeyCode::PageUp),
            (KeyCode::PageDown, ForeignKeyCode::PageDown),
            (KeyCode::Insert, ForeignKeyCode::Insert),
        ];
        for (input, expected) in table {
            assert_eq!(
                translate_key(&key(input, KeyModifiers::empty())),
                Some(ForeignKey::new(expected))
            );
        }
    }

    #[test]
    fn test_printable_char_with_alt() {
        let translated = translate_key(&key(KeyCode::Char('x'), KeyModifiers::ALT));
        assert_eq!(
            translated,
            Some(ForeignKey {
                code: ForeignKeyCode::Char('x'),
                alt: true
            })
        );
    }

    #[test]
    fn test_control_modifier_is_dropped() {
        let translated = translate_key(&key(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert_eq!(translated, Some(ForeignKey::new(ForeignKeyCode::Char('d'))));
    }

    #[test]
    fn test_unmapped_keys_produce_nothing() {
        assert!(translate_key(&key(KeyCode::F(5), KeyModifiers::empty())).is_none());
        assert!(translate_key(&key(KeyCode::Char('\u{7}'), KeyModifiers::empty())).is_none());
        assert!(translate_key(&key(KeyCode::BackTab, KeyModifiers::SHIFT)).is_none());
    }

    #[test]
    fn test_display() {
        let key = ForeignKey {
            code: ForeignKeyCode::Enter,
            alt: true,
        };
        assert_eq!(key.to_string(), "alt+enter");
    }
}
