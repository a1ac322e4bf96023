use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned extent in map coordinates (`[min_x, min_y, max_x, max_y]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates new bounds from two points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Creates the smallest bounds containing both corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_coords(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if the bounds intersect with another bounds
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y)
    }

    /// Checks if the bounds are valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Clamps a point to be within the bounds
    pub fn clamp(&self, point: &Point) -> Point {
        Point::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Grows the bounds to also cover `other`
    pub fn extend(&mut self, other: &Bounds) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    /// Returns the extent as `[min_x, min_y, max_x, max_y]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_creation() {
        let bounds = Bounds::from_coords(0.0, 0.0, 5430.0, 3575.0);
        assert_eq!(bounds.width(), 5430.0);
        assert_eq!(bounds.height(), 3575.0);
        assert_eq!(bounds.center(), Point::new(2715.0, 1787.5));
    }

    #[test]
    fn test_from_corners_normalises() {
        let bounds = Bounds::from_corners(Point::new(30.0, -10.0), Point::new(-30.0, 10.0));
        assert_eq!(bounds.to_array(), [-30.0, -10.0, 30.0, 10.0]);
        assert!(bounds.is_valid());
    }

    #[test]
    fn test_bounds_contains_and_clamp() {
        let bounds = Bounds::from_coords(300.0, 300.0, 5000.0, 3000.0);
        assert!(bounds.contains(&Point::new(300.0, 3000.0)));
        assert!(!bounds.contains(&Point::new(299.0, 1000.0)));
        assert_eq!(bounds.clamp(&Point::new(0.0, 4000.0)), Point::new(300.0, 3000.0));
    }

    #[test]
    fn test_bounds_intersects() {
        let a = Bounds::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::from_coords(5.0, 5.0, 15.0, 15.0);
        let c = Bounds::from_coords(11.0, 11.0, 15.0, 15.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
