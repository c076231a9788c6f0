//! # Registry Module
//!
//! The hierarchical registry of components and groups, plus the builder used
//! to populate it at startup.
//!
//! - [`EntryTree`] - the tree itself and its flattened-view operations
//! - [`RegistryBuilder`] - explicit registration context (`register`,
//!   `begin_group` / `end_group`, `group`)

pub mod builder;
pub mod entry;

pub use builder::RegistryBuilder;
pub use entry::{ComponentFactory, Entry, EntryTree, Factory, FlatEntry, ProgramFactory};
