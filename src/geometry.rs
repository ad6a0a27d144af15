//! Geometric primitives for region detection.
//!
//! Every detector and the consolidator work in terms of [`Rect`], an
//! axis-aligned rectangle in page coordinates (origin top-left, y growing
//! downward, as the document backend reports them).

/// An axis-aligned rectangle `(x0, y0)-(x1, y1)` in page coordinates.
///
/// A rect is *valid* when all coordinates are finite and *empty* when its
/// width or height is not positive. Detectors must discard any rect that is
/// invalid or empty before emitting a candidate region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Creates a rectangle from two corner points.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the rectangle (may be negative before [`normalize`](Self::normalize)).
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle (may be negative before [`normalize`](Self::normalize)).
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// True when every coordinate is finite.
    pub fn is_valid(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// True when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Returns a copy with coordinates swapped so that `x0 <= x1` and `y0 <= y1`.
    pub fn normalize(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    /// Enclosed area; zero for empty or invalid rectangles.
    pub fn area(&self) -> f32 {
        if !self.is_valid() || self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Overlap of `self` and `other`; empty when the rectangles are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    /// Grows (or shrinks, for negative deltas) each edge outward.
    pub fn expand(&self, dx0: f32, dy0: f32, dx1: f32, dy1: f32) -> Rect {
        Rect {
            x0: self.x0 + dx0,
            y0: self.y0 + dy0,
            x1: self.x1 + dx1,
            y1: self.y1 + dy1,
        }
    }

    /// True when the rectangles intersect after expanding `self` by
    /// `tolerance` on every side.
    ///
    /// This is the proximity test used by the consolidator: two rects are
    /// "near" when they overlap or their gap is within the tolerance.
    pub fn near(&self, other: &Rect, tolerance: f32) -> bool {
        !self
            .expand(-tolerance, -tolerance, tolerance, tolerance)
            .intersect(other)
            .is_empty()
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && self.x1 >= other.x1 && self.y1 >= other.y1
    }
}
