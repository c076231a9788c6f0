use crate::component::{Component, Effect, Message};
use crossterm::event::KeyCode;

#[derive(Debug, Default)]
pub struct Toggle {
    checked: bool,
}

impl Toggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

impl Component for Toggle {
    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>> {
        if let Message::Key(key) = message {
            if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                self.checked = !self.checked;
            }
        }
        Ok(None)
    }

    fn view(&self) -> String {
        let checkbox = if self.checked { "[*]" } else { "[ ]" };
        format!("Toggle: {checkbox}\n\n(Press space or enter to toggle)")
    }
}
