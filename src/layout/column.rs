use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::{Rect, Size};

/// Stable identity of an item: its section and its index within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId {
    pub section: usize,
    pub item: usize,
}

impl ItemId {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section, self.item)
    }
}

/// An item together with the rectangle it was placed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: ItemId,
    pub rect: Rect,
}

/// A vertical bucket inside a section.
///
/// Items stack top to bottom. The first item sits directly on the column's
/// initial edge; every later item is separated from its predecessor by
/// `spacing`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    index: usize,
    x_offset: f64,
    width: f64,
    spacing: f64,
    bottom_edge: f64,
    items: Vec<PlacedItem>,
}

impl Column {
    pub fn new(index: usize, x_offset: f64, width: f64, spacing: f64, initial_y: f64) -> Self {
        Self {
            index,
            x_offset,
            width,
            spacing,
            bottom_edge: initial_y,
            items: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn bottom_edge(&self) -> f64 {
        self.bottom_edge
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Place an item scaled to the column width.
    ///
    /// Returns `DegenerateGeometry` without touching the column when the
    /// intrinsic width is not positive or either dimension is not finite.
    pub fn append(&mut self, id: ItemId, intrinsic: Size) -> Result<Rect> {
        let ratio = intrinsic
            .aspect_ratio()
            .ok_or_else(|| LayoutError::DegenerateGeometry {
                item: id,
                width: intrinsic.width,
                height: intrinsic.height,
            })?;
        let width = self.width.floor();
        Ok(self.place(id, width, (width * ratio).floor()))
    }

    /// Place an item with no height, following the same spacing rule.
    pub fn append_zero_height(&mut self, id: ItemId) -> Rect {
        self.place(id, self.width.floor(), 0.0)
    }

    fn place(&mut self, id: ItemId, width: f64, height: f64) -> Rect {
        let top = if self.items.is_empty() {
            self.bottom_edge
        } else {
            self.bottom_edge + self.spacing
        };
        let rect = Rect::new(self.x_offset, top, width, height);
        self.items.push(PlacedItem { id, rect });
        self.bottom_edge = rect.bottom();
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(item: usize) -> ItemId {
        ItemId::new(0, item)
    }

    #[test]
    fn new_column_starts_at_initial_edge() {
        let column = Column::new(0, 0.0, 100.0, 5.0, 42.0);
        assert_eq!(column.bottom_edge(), 42.0);
        assert!(column.is_empty());
    }

    #[test]
    fn append_scales_by_aspect_ratio_and_floors() {
        let mut column = Column::new(1, 100.5, 99.7, 0.0, 0.0);
        let rect = column.append(id(0), Size::new(4.0, 2.0)).unwrap();
        assert_eq!(rect, Rect::new(100.5, 0.0, 99.0, 49.0));
        assert_eq!(column.bottom_edge(), 49.0);
    }

    #[test]
    fn first_item_has_no_leading_spacing() {
        let mut column = Column::new(0, 0.0, 100.0, 10.0, 20.0);
        let first = column.append(id(0), Size::new(100.0, 50.0)).unwrap();
        let second = column.append(id(1), Size::new(100.0, 30.0)).unwrap();

        assert_eq!(first.y, 20.0);
        assert_eq!(second.y, 80.0);
        assert_eq!(column.bottom_edge(), 110.0);
    }

    #[test]
    fn degenerate_size_leaves_column_untouched() {
        let mut column = Column::new(0, 0.0, 100.0, 0.0, 0.0);
        let err = column.append(id(3), Size::new(0.0, 80.0)).unwrap_err();

        assert!(matches!(err, LayoutError::DegenerateGeometry { item, .. } if item == id(3)));
        assert!(column.is_empty());
        assert_eq!(column.bottom_edge(), 0.0);
    }

    #[test]
    fn zero_height_item_still_takes_spacing() {
        let mut column = Column::new(0, 0.0, 100.0, 4.0, 0.0);
        column.append(id(0), Size::new(1.0, 1.0)).unwrap();
        let rect = column.append_zero_height(id(1));

        assert_eq!(rect, Rect::new(0.0, 104.0, 100.0, 0.0));
        assert_eq!(column.bottom_edge(), 104.0);
        assert_eq!(column.len(), 2);
    }
}
