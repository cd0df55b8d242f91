//! Geometry primitives shared by extraction and reassembly.
//!
//! All coordinates are page units in the extraction convention: the origin is
//! the top-left corner of the page and `y` grows downward. Reassembly converts
//! to the bottom-up PDF convention explicitly.

use serde::Serialize;

/// An axis-aligned bounding box in top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge (smallest y)
    pub y0: f32,
    /// Bottom edge (largest y)
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its edges.
    pub fn new(x0: f32, x1: f32, y0: f32, y1: f32) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            x1: self.x1.max(other.x1),
            y0: self.y0.min(other.y0),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of a sequence of boxes, or `None` when the sequence is empty.
    pub fn enclosing<I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = BoundingBox>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f32) -> BoundingBox {
        BoundingBox {
            x0: self.x0 - margin,
            x1: self.x1 + margin,
            y0: self.y0 - margin,
            y1: self.y1 + margin,
        }
    }
}

/// A straight line segment, used for table borders.
///
/// Endpoints are normalized so that `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Left x
    pub x0: f32,
    /// Top y
    pub y0: f32,
    /// Right x
    pub x1: f32,
    /// Bottom y
    pub y1: f32,
}

impl Segment {
    /// Create a segment from two endpoints in any order.
    pub fn new(xa: f32, ya: f32, xb: f32, yb: f32) -> Self {
        Self {
            x0: xa.min(xb),
            y0: ya.min(yb),
            x1: xa.max(xb),
            y1: ya.max(yb),
        }
    }

    /// Horizontal segments have (almost) no vertical extent.
    pub fn is_horizontal(&self, tolerance: f32) -> bool {
        self.y1 - self.y0 <= tolerance && self.x1 - self.x0 > tolerance
    }

    /// Vertical segments have (almost) no horizontal extent.
    pub fn is_vertical(&self, tolerance: f32) -> bool {
        self.x1 - self.x0 <= tolerance && self.y1 - self.y0 > tolerance
    }
}

/// Border segments of a table, split by orientation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Borders {
    /// Horizontal rules, top to bottom as found on the page
    pub horizontal: Vec<Segment>,
    /// Vertical rules, as found on the page
    pub vertical: Vec<Segment>,
}

impl Borders {
    /// Check if the table has no border segments.
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }

    /// Iterate all segments regardless of orientation.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.horizontal.iter().chain(self.vertical.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_enclosing() {
        let a = BoundingBox::new(10.0, 20.0, 5.0, 15.0);
        let b = BoundingBox::new(0.0, 12.0, 8.0, 30.0);
        assert_eq!(a.union(&b), BoundingBox::new(0.0, 20.0, 5.0, 30.0));
        assert_eq!(BoundingBox::enclosing(vec![a, b]), Some(a.union(&b)));
        assert_eq!(BoundingBox::enclosing(Vec::new()), None);
    }

    #[test]
    fn test_segment_orientation() {
        let h = Segment::new(100.0, 50.0, 10.0, 50.2);
        assert_eq!(h.x0, 10.0);
        assert!(h.is_horizontal(1.0));
        assert!(!h.is_vertical(1.0));

        let v = Segment::new(10.0, 80.0, 10.0, 20.0);
        assert_eq!(v.y0, 20.0);
        assert!(v.is_vertical(1.0));

        let diagonal = Segment::new(0.0, 0.0, 10.0, 10.0);
        assert!(!diagonal.is_horizontal(1.0));
        assert!(!diagonal.is_vertical(1.0));
    }
}
