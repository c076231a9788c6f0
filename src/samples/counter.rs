use crate::component::{Component, Effect, Message};
use crossterm::event::KeyCode;

#[derive(Debug, Default)]
pub struct Counter {
    count: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for Counter {
    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>> {
        if let Message::Key(key) = message {
            match key.code {
                KeyCode::Char('+' | 'k') | KeyCode::Up => self.count += 1,
                KeyCode::Char('-' | 'j') | KeyCode::Down => self.count -= 1,
                _ => {}
            }
        }
        Ok(None)
    }

    fn view(&self) -> String {
        format!(
            "Count: {}\n\n(Press '+' or 'k' to increment, '-' or 'j' to decrement)",
            self.count
        )
    }
}
