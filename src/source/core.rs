use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::layout::ItemId;

/// Collaborator queried by the engine during a layout pass.
///
/// The optional hooks default to `None`, in which case the engine falls back
/// to the values in its `LayoutConfig`.
pub trait CascadeSource {
    fn section_count(&self) -> usize;

    fn item_count(&self, section: usize) -> usize;

    fn container_width(&self) -> f64;

    fn column_count(&self, _section: usize) -> Option<usize> {
        None
    }

    fn intrinsic_size(&self, _item: ItemId) -> Option<Size> {
        None
    }
}

/// One section of a [`StaticSource`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSection {
    #[serde(default)]
    pub column_count: Option<usize>,
    pub item_sizes: Vec<Size>,
}

impl StaticSection {
    pub fn new(column_count: usize, item_sizes: Vec<Size>) -> Self {
        Self {
            column_count: Some(column_count),
            item_sizes,
        }
    }

    /// `count` items of the same size.
    pub fn uniform(column_count: usize, count: usize, size: Size) -> Self {
        Self::new(column_count, vec![size; count])
    }
}

/// In-memory source backed by plain vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSource {
    pub container_width: f64,
    pub sections: Vec<StaticSection>,
}

impl StaticSource {
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: StaticSection) -> Self {
        self.sections.push(section);
        self
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }
}

impl CascadeSource for StaticSource {
    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn item_count(&self, section: usize) -> usize {
        self.sections
            .get(section)
            .map(|section| section.item_sizes.len())
            .unwrap_or(0)
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn column_count(&self, section: usize) -> Option<usize> {
        self.sections.get(section).and_then(|section| section.column_count)
    }

    fn intrinsic_size(&self, item: ItemId) -> Option<Size> {
        self.sections
            .get(item.section)
            .and_then(|section| section.item_sizes.get(item.item))
            .copied()
    }
}
