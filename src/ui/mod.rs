//! # UI Module
//!
//! The shell around the preview host: state, routing and drawing.
//!
//! ## Layout
//!
//! ```text
//! ┌ Components ──────┐┌──────────────────────────────────────────┐
//! │  ↑ more          ││                                          │
//! │> Welcome         ││  Counter                                 │
//! │  ▼ Interactive   ││                                          │
//! │      Counter     ││  Count: 3                                │
//! │      Toggle      ││                                          │
//! │  ▶ Feedback      ││                                          │
//! │  ↓ more          ││  Press TAB to focus preview • Press ? …  │
//! └──────────────────┘└──────────────────────────────────────────┘
//! ```
//!
//! - [`App`] - shell controller (focus, help overlay, event routing)
//! - [`navigator`] - cursor and scroll state of the list pane
//! - [`mod@render`] / [`help`] - drawing
//! - [`theme`] / [`config`] - colors and persisted settings

pub mod app;
pub mod config;
pub mod help;
pub mod navigator;
pub mod render;
pub mod theme;

pub use app::{App, FocusPane};
pub use render::render;
