use crate::component::{Component, Effect, Message};
use crossterm::event::KeyCode;

const STEP: u8 = 10;
const MAX_BAR: u16 = 40;

#[derive(Debug)]
pub struct ProgressBar {
    percent: u8,
    bar_width: u16,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            percent: 0,
            bar_width: MAX_BAR,
        }
    }
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(&self) -> String {
        let width = usize::from(self.bar_width);
        let filled = width * usize::from(self.percent) / 100;
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }
}

impl Component for ProgressBar {
    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>> {
        match message {
            Message::Resize { width, .. } => {
                self.bar_width = width.saturating_sub(4).min(MAX_BAR);
            }
            Message::Key(key) => match key.code {
                KeyCode::Char('+' | 'l') | KeyCode::Right => {
                    self.percent = (self.percent + STEP).min(100);
                }
                KeyCode::Char('-' | 'h') | KeyCode::Left => {
                    self.percent = self.percent.saturating_sub(STEP);
                }
                KeyCode::Char('r') => self.percent = 0,
                _ => {}
            },
            _ => {}
        }
        Ok(None)
    }

    fn view(&self) -> String {
        format!(
            "\n  {}\n\n  {}%\n\n  (Press '+' or 'l' to increase, '-' or 'h' to decrease, 'r' to reset)",
            self.bar(),
            self.percent
        )
    }
}
