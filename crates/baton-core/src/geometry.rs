//! Geometric primitives for element placement.
//!
//! Only what the document model needs: a position and a size per element.
//! Layout computation happens in external collaborators; these types carry
//! the values through the model and the interchange codec.
//!
//! The coordinate system matches the diagram interchange convention: origin
//! at the top-left, X increasing rightward, Y increasing downward.

use serde::{Deserialize, Serialize};

/// A 2D position in diagram coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }
}

/// Width and height dimensions of an element's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new size with the specified dimensions
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_accessors() {
        let p = Point::new(100.0, 250.5);
        assert_eq!(p.x(), 100.0);
        assert_eq!(p.y(), 250.5);
    }

    #[test]
    fn test_size_accessors() {
        let s = Size::new(36.0, 36.0);
        assert_eq!(s.width(), 36.0);
        assert_eq!(s.height(), 36.0);
    }
}
