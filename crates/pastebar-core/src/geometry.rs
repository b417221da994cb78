use serde::{Deserialize, Serialize};

/// A point in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal position, growing rightward.
    pub x: f64,
    /// Vertical position, growing downward.
    pub y: f64,
}

impl Coordinate {
    /// Create a coordinate from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box of a droppable or of the dragged item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Distance of the top edge from the origin.
    pub top: f64,
    /// Distance of the left edge from the origin.
    pub left: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Position of the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Position of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Top-left corner as a coordinate.
    #[must_use]
    pub const fn top_left(&self) -> Coordinate {
        Coordinate::new(self.left, self.top)
    }

    /// Corners in a fixed order: top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.left, self.top),
            Coordinate::new(self.right(), self.top),
            Coordinate::new(self.left, self.bottom()),
            Coordinate::new(self.right(), self.bottom()),
        ]
    }
}
