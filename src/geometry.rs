use serde::{Deserialize, Serialize};

/// Width/height pair in layout points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Height over width, or `None` when the width cannot divide.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width <= 0.0 {
            return None;
        }
        let ratio = self.height.max(0.0) / self.width;
        ratio.is_finite().then_some(ratio)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Overlap test. Rects that only share an edge do not intersect, except
    /// that a rect with no extent on an axis (a zero-height item, say)
    /// counts when it lies within the other rect's closed span on that axis.
    pub fn intersects(&self, other: &Rect) -> bool {
        spans_overlap(self.x, self.width, other.x, other.width)
            && spans_overlap(self.y, self.height, other.y, other.height)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

fn spans_overlap(start: f64, len: f64, other_start: f64, other_len: f64) -> bool {
    let end = start + len;
    let other_end = other_start + other_len;
    if len <= 0.0 || other_len <= 0.0 {
        return start <= other_end && other_start <= end;
    }
    start < other_end && other_start < end
}

/// Per-section padding applied around the column grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_rejects_zero_and_negative_width() {
        assert_eq!(Size::new(0.0, 10.0).aspect_ratio(), None);
        assert_eq!(Size::new(-5.0, 10.0).aspect_ratio(), None);
        assert_eq!(Size::new(f64::NAN, 10.0).aspect_ratio(), None);
        assert_eq!(Size::new(f64::MIN_POSITIVE, f64::MAX).aspect_ratio(), None);
        assert_eq!(Size::new(100.0, 50.0).aspect_ratio(), Some(0.5));
    }

    #[test]
    fn rects_sharing_an_edge_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let below = Rect::new(0.0, 100.0, 100.0, 50.0);
        let beside = Rect::new(100.0, 0.0, 50.0, 100.0);
        let overlapping = Rect::new(50.0, 99.0, 100.0, 50.0);
        assert!(!a.intersects(&below));
        assert!(!below.intersects(&a));
        assert!(!a.intersects(&beside));
        assert!(a.intersects(&overlapping));
    }

    #[test]
    fn zero_height_rects_match_within_closed_span() {
        let query = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inside = Rect::new(10.0, 40.0, 50.0, 0.0);
        let on_bottom = Rect::new(10.0, 100.0, 50.0, 0.0);
        let below = Rect::new(10.0, 100.5, 50.0, 0.0);
        assert!(query.intersects(&inside));
        assert!(inside.intersects(&query));
        assert!(query.intersects(&on_bottom));
        assert!(!query.intersects(&below));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 20.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 25.0));
    }
}
