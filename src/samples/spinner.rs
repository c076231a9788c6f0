use crate::component::{Component, Effect, Message};
use std::time::Duration;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const INTERVAL: Duration = Duration::from_millis(100);

/// Animated spinner driven by self-scheduled ticks.
///
/// A spinner built with [`Spinner::rounds`] stops after that many passes over
/// its frames and asks to quit.
#[derive(Debug, Default)]
pub struct Spinner {
    frame: usize,
    limit: Option<usize>,
    done: bool,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds(rounds: usize) -> Self {
        Self {
            limit: Some(rounds * FRAMES.len()),
            ..Self::default()
        }
    }
}

impl Component for Spinner {
    fn init(&mut self) -> Option<Effect> {
        Some(Effect::tick(INTERVAL, 0))
    }

    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>> {
        if !matches!(message, Message::Tick(_)) || self.done {
            return Ok(None);
        }
        if self.limit.is_some_and(|limit| self.frame + 1 >= limit) {
            self.done = true;
            return Ok(Some(Effect::Quit));
        }
        self.frame += 1;
        Ok(Some(Effect::tick(INTERVAL, 0)))
    }

    fn view(&self) -> String {
        if self.done {
            return "\n\n   ✓ Loaded.".to_string();
        }
        format!("\n\n   {} Loading...", FRAMES[self.frame % FRAMES.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_and_reschedules() {
        let mut spinner = Spinner::new();
        assert_eq!(spinner.init(), Some(Effect::tick(INTERVAL, 0)));
        let before = spinner.view();
        let effect = spinner.update(&Message::Tick(0)).expect("update");
        assert_eq!(effect, Some(Effect::tick(INTERVAL, 0)));
        assert_ne!(spinner.view(), before);
    }

    #[test]
    fn test_finite_spinner_quits() {
        let mut spinner = Spinner::rounds(1);
        let mut effects = Vec::new();
        for _ in 0..FRAMES.len() {
            effects.push(spinner.update(&Message::Tick(0)).expect("update"));
        }
        assert_eq!(effects.last(), Some(&Some(Effect::Quit)));
        assert!(spinner.view().contains("Loaded"));
        assert_eq!(spinner.update(&Message::Tick(0)).expect("update"), None);
    }
}
