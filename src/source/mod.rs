//! Source module orchestrator.
//!
//! The hosting UI layer implements [`CascadeSource`] to feed counts and item
//! sizes into the engine. [`StaticSource`] covers hosts whose data is
//! already in memory.

mod core;

pub use core::{CascadeSource, StaticSection, StaticSource};
