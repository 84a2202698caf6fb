use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{EdgeInsets, Size};

pub const DEFAULT_COLUMN_COUNT: usize = 1;
pub const DEFAULT_ITEM_SIZE: Size = Size::new(600.0, 800.0);
pub const DEFAULT_MAX_COLUMN_COUNT: usize = 256;
pub const DEFAULT_MAX_ITEMS_PER_SECTION: usize = 10_000_000;

/// Geometry knobs shared by every section of a layout.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use cascade_layout::LayoutConfig;
///
/// let config = LayoutConfig::from_json_str(r#"{ "minimum_line_spacing": 8 }"#)?;
/// assert_eq!(config.minimum_line_spacing, 8.0);
/// assert_eq!(config.default_column_count, 1);
/// # Ok::<(), cascade_layout::LayoutError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical gap between consecutive items in one column.
    pub minimum_line_spacing: f64,
    /// Horizontal gap between adjacent columns.
    pub minimum_interitem_spacing: f64,
    /// Padding around each section's column grid.
    pub section_insets: EdgeInsets,
    /// Used when the source declines to answer, or answers zero.
    pub default_column_count: usize,
    /// Used when the source has no intrinsic size for an item.
    pub default_item_size: Size,
    /// Larger column counts from the source are clamped to this.
    pub max_column_count: usize,
    /// Items past this index in a section are not laid out.
    pub max_items_per_section: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            minimum_line_spacing: 0.0,
            minimum_interitem_spacing: 0.0,
            section_insets: EdgeInsets::ZERO,
            default_column_count: DEFAULT_COLUMN_COUNT,
            default_item_size: DEFAULT_ITEM_SIZE,
            max_column_count: DEFAULT_MAX_COLUMN_COUNT,
            max_items_per_section: DEFAULT_MAX_ITEMS_PER_SECTION,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.minimum_line_spacing = spacing;
        self
    }

    pub fn with_interitem_spacing(mut self, spacing: f64) -> Self {
        self.minimum_interitem_spacing = spacing;
        self
    }

    pub fn with_section_insets(mut self, insets: EdgeInsets) -> Self {
        self.section_insets = insets;
        self
    }

    pub fn with_default_column_count(mut self, count: usize) -> Self {
        self.default_column_count = count;
        self
    }

    pub fn with_default_item_size(mut self, size: Size) -> Self {
        self.default_item_size = size;
        self
    }

    pub fn with_max_column_count(mut self, count: usize) -> Self {
        self.max_column_count = count;
        self
    }

    pub fn with_max_items_per_section(mut self, count: usize) -> Self {
        self.max_items_per_section = count;
        self
    }

    /// Copy with every negative or non-finite length replaced by zero and
    /// column counts within `1..=max_column_count`.
    pub fn sanitized(&self) -> Self {
        let insets = self.section_insets;
        let max_column_count = self.max_column_count.max(1);
        Self {
            minimum_line_spacing: non_negative(self.minimum_line_spacing),
            minimum_interitem_spacing: non_negative(self.minimum_interitem_spacing),
            section_insets: EdgeInsets::new(
                non_negative(insets.top),
                non_negative(insets.left),
                non_negative(insets.bottom),
                non_negative(insets.right),
            ),
            default_column_count: self.default_column_count.clamp(1, max_column_count),
            default_item_size: self.default_item_size,
            max_column_count,
            max_items_per_section: self.max_items_per_section,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
