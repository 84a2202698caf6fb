//! Cascading (masonry) grid layout.
//!
//! Items of a sectioned collection are packed into a fixed number of columns
//! per section. Each item goes to whichever column is currently shortest, so
//! column heights stay balanced whatever the items' aspect ratios. The host
//! UI layer supplies counts and intrinsic sizes through [`CascadeSource`] and
//! reads placed rectangles back from the [`LayoutEngine`].

pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod source;

pub use error::{LayoutError, Result};
pub use geometry::{EdgeInsets, Rect, Size};
pub use layout::{
    Column, ItemId, LayoutConfig, LayoutEngine, LayoutState, PlacedItem, PrepareOutcome,
    PreparedLayout, Section, SectionRequest,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use source::{CascadeSource, StaticSection, StaticSource};
