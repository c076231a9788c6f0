use crate::component::{Component, Effect, Message};
use crossterm::event::{KeyCode, KeyModifiers};

const PLACEHOLDER: &str = "Type something...";
const CURSOR: char = '▏';

/// Single-line text field with a movable cursor.
#[derive(Debug, Default)]
pub struct TextInput {
    value: Vec<char>,
    cursor: usize,
    submitted: Option<String>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }
}

impl Component for TextInput {
    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>> {
        let Message::Key(key) = message else {
            return Ok(None);
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                self.value.clear();
                self.cursor = 0;
            }
            KeyCode::Char(c) if !ctrl => {
                self.value.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.value.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.value.len() => {
                self.value.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            KeyCode::Enter => {
                self.submitted = Some(self.value());
                self.value.clear();
                self.cursor = 0;
            }
            _ => {}
        }
        Ok(None)
    }

    fn view(&self) -> String {
        let field = if self.value.is_empty() {
            format!("{CURSOR}{PLACEHOLDER}")
        } else {
            let (before, after) = self.value.split_at(self.cursor);
            let before: String = before.iter().collect();
            let after: String = after.iter().collect();
            format!("{before}{CURSOR}{after}")
        };
        let mut out = format!("What's your name?\n\n> {field}\n\n");
        if let Some(submitted) = &self.submitted {
            out.push_str(&format!("You entered: {submitted}\n\n"));
        }
        out.push_str("(Enter to submit, Ctrl+U to clear)");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn type_text(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.update(&key(KeyCode::Char(c))).expect("update");
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut input = TextInput::new();
        type_text(&mut input, "helo");
        input.update(&key(KeyCode::Left)).expect("update");
        type_text(&mut input, "l");
        assert_eq!(input.value(), "hello");
        input.update(&key(KeyCode::End)).expect("update");
        input.update(&key(KeyCode::Backspace)).expect("update");
        assert_eq!(input.value(), "hell");
    }

    #[test]
    fn test_submit_and_clear() {
        let mut input = TextInput::new();
        type_text(&mut input, "Ada");
        input.update(&key(KeyCode::Enter)).expect("update");
        assert!(input.view().contains("You entered: Ada"));
        assert!(input.view().contains(PLACEHOLDER));

        type_text(&mut input, "xyz");
        let ctrl_u = Message::Key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        input.update(&ctrl_u).expect("update");
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = TextInput::new();
        input.update(&key(KeyCode::Backspace)).expect("update");
        input.update(&key(KeyCode::Delete)).expect("update");
        assert_eq!(input.value(), "");
    }
}
