use crate::core::constants::MAP_HEIGHT;
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A point in map coordinates (y grows upwards) or in screen pixels (y grows
/// downwards), depending on where it is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Integer position in the map image's local pixel space, as produced by the
/// GPS regression. Origin top-left, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Position in engine map coordinates
    pub fn to_map_point(&self) -> Point {
        image_to_map(self.x as f64, self.y as f64)
    }
}

/// Converts a location-data pixel position into engine map coordinates.
///
/// Location data counts y from the top of the image, the engine from the
/// bottom. Every consumer of location pixels goes through here.
pub fn image_to_map(pixel_x: f64, pixel_y: f64) -> Point {
    Point::new(pixel_x, MAP_HEIGHT - pixel_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(19.1334, 72.9133);
        assert_eq!(coord.lat, 19.1334);
        assert_eq!(coord.lng, 72.9133);
        assert!(coord.is_valid());
        assert!(!LatLng::new(95.0, 0.0).is_valid());
    }

    #[test]
    fn test_vertical_flip() {
        for y in [0.0, 1.0, 1200.0, 3575.0] {
            let p = image_to_map(42.0, y);
            assert_eq!(p.x, 42.0);
            assert_eq!(p.y, 3575.0 - y);
        }
        assert_eq!(PixelPoint::new(100, 75).to_map_point(), Point::new(100.0, 3500.0));
    }

    #[test]
    fn test_point_math() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.add(&b), Point::new(5.0, 8.0));
        assert_eq!(b.subtract(&a), Point::new(3.0, 4.0));
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(a.lerp(&b, 0.5), Point::new(2.5, 4.0));
    }
}
