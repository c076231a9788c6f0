//! Widgetbook - a terminal component gallery
//!
//! Register interactive widgets under nested, collapsible groups, then browse
//! them in a sidebar and drive the selected one live in a preview pane. Widgets
//! either run inside the host loop ([`component::Component`]) or run their own
//! loop on a separate thread behind the bridge ([`bridge::ForeignProgram`]).

pub mod bridge;
pub mod component;
pub mod host;
pub mod registry;
pub mod samples;
pub mod ui;
