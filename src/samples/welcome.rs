use crate::component::{Component, Effect, Message};
use crossterm::event::KeyCode;

const INTRO: &str = "Welcome to widgetbook!\n\n\
Pick an entry on the left to load it here. Press TAB to send keys to the\n\
loaded component and ESC to get back to the list.";

const TIPS: &str = "\n\n\
• Groups open and close with Enter, → and ←\n\
• Timers of a component stop as soon as you leave it\n\
• A component that fails shows its error here; the gallery keeps running";

/// Intro page. Space shows or hides the tips.
#[derive(Debug, Default)]
pub struct Welcome {
    show_tips: bool,
}

impl Welcome {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for Welcome {
    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>> {
        if let Message::Key(key) = message {
            if key.code == KeyCode::Char(' ') {
                self.show_tips = !self.show_tips;
            }
        }
        Ok(None)
    }

    fn view(&self) -> String {
        if self.show_tips {
            format!("{INTRO}{TIPS}\n\n(Press space to hide tips)")
        } else {
            format!("{INTRO}\n\n(Press space for tips)")
        }
    }
}
