//! Layout module orchestrator.
//!
//! Downstream code imports layout types from here; columns and sections are
//! building blocks of the [`LayoutEngine`] pass.

mod column;
mod config;
mod engine;
mod section;

pub use column::{Column, ItemId, PlacedItem};
pub use config::{
    DEFAULT_COLUMN_COUNT, DEFAULT_ITEM_SIZE, DEFAULT_MAX_COLUMN_COUNT, DEFAULT_MAX_ITEMS_PER_SECTION,
    LayoutConfig,
};
pub use engine::{
    ENGINE_TARGET, LayoutEngine, LayoutState, METRICS_TARGET, PrepareOutcome, PreparedLayout,
};
pub use section::{Section, SectionRequest};
