//! # Host Module
//!
//! Owns the single active component session and everything that feeds it.
//!
//! - [`PreviewHost`] - load / forward / resize / render of the live session
//! - [`TimerQueue`] - deferred effects requested by in-loop components
//! - [`isolate`] - the panic boundary around component code

pub mod isolate;
pub mod preview;
pub mod timers;

pub use preview::{PreviewHost, SessionStatus};
pub use timers::TimerQueue;

use std::fmt;

/// Identifies one load of a component. Strictly increasing per host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
