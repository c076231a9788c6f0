//! # Component Capability
//!
//! The contract every embeddable widget satisfies. Components are authored by
//! collaborators; the host only relies on the three operations below.
//!
//! ```text
//!   init()          -> optional startup effect
//!   update(message) -> optional deferred effect (or an error)
//!   view()          -> plain text, no side effects
//! ```
//!
//! A component must accept [`Message::Resize`] at any point in its lifetime,
//! including before any other message.

use crossterm::event::{KeyEvent, MouseEvent};
use std::time::Duration;

/// An input delivered to a component by the preview host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A key press forwarded while the preview pane holds focus.
    Key(KeyEvent),
    /// A mouse event forwarded while the preview pane holds focus.
    Mouse(MouseEvent),
    /// The size of the area the component may draw into.
    Resize { width: u16, height: u16 },
    /// A message the component scheduled for itself via [`Effect::After`].
    Tick(u64),
}

/// A deferred effect requested by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `message` back to the same component after `delay`.
    After(Duration, Message),
    /// Several effects at once.
    Batch(Vec<Effect>),
    /// The component is done. Its session stops receiving events; the host keeps running.
    Quit,
}

impl Effect {
    /// Shorthand for a [`Message::Tick`] scheduled after `delay`.
    pub fn tick(delay: Duration, id: u64) -> Self {
        Effect::After(delay, Message::Tick(id))
    }

    /// Combine two optional effects, collapsing empty and single-element batches.
    pub fn merge(first: Option<Effect>, second: Option<Effect>) -> Option<Effect> {
        match (first, second) {
            (None, None) => None,
            (Some(e), None) | (None, Some(e)) => Some(e),
            (Some(a), Some(b)) => Some(Effect::Batch(vec![a, b])),
        }
    }
}

/// An interactive widget that can be hosted in the preview pane.
pub trait Component {
    /// Startup effect, e.g. the first tick of an animation.
    fn init(&mut self) -> Option<Effect> {
        None
    }

    /// Handle a message and optionally request a deferred effect.
    fn update(&mut self, message: &Message) -> anyhow::Result<Option<Effect>>;

    /// Render the current state.
    fn view(&self) -> String;
}
