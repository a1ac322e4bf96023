use crate::animation::{
    easing::EasingType,
    view::{AnimationSet, ViewAnimation, ViewProperty},
};
use crate::core::{
    bounds::Bounds,
    config::ViewOptions,
    constants::TILE_SIZE,
    geo::Point,
};
use std::time::Duration;

/// Manages the current view of the map: center, zoom, and screen dimensions.
///
/// Map coordinates live in the image's local projection (y up). Screen
/// pixels are relative to the top-left corner of the map element (y down).
#[derive(Debug, Clone)]
pub struct Viewport {
    /// The center of the view in map coordinates
    center: Point,
    /// The current zoom level
    zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    /// Map units per pixel at zoom 0
    max_resolution: f64,
    projection_extent: Bounds,
    /// Extent the center is constrained to
    center_extent: Option<Bounds>,
    animations: AnimationSet,
    animation_duration: Duration,
    animation_easing: EasingType,
}

impl Viewport {
    /// Creates a view centered on the projection extent
    pub fn new(options: &ViewOptions) -> Self {
        let extent = options.projection_extent.clone();
        let max_resolution = extent.width().max(extent.height()) / TILE_SIZE;
        let mut viewport = Self {
            center: extent.center(),
            zoom: options.initial_zoom,
            size: options.size,
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
            max_resolution,
            projection_extent: extent,
            center_extent: Some(options.center_extent.clone()),
            animations: AnimationSet::new(),
            animation_duration: options.animation_duration,
            animation_easing: options.animation_easing,
        };
        let center = viewport.center;
        viewport.set_center(center);
        viewport.set_zoom(options.initial_zoom);
        viewport
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn projection_extent(&self) -> &Bounds {
        &self.projection_extent
    }

    /// Sets the center, keeping it inside the center extent
    pub fn set_center(&mut self, center: Point) {
        self.center = self.constrain_center(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.constrain_zoom(zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    fn constrain_center(&self, center: Point) -> Point {
        match &self.center_extent {
            Some(extent) => extent.clamp(&center),
            None => center,
        }
    }

    fn constrain_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Map units per screen pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        self.resolution_for_zoom(self.zoom)
    }

    pub fn resolution_for_zoom(&self, zoom: f64) -> f64 {
        self.max_resolution / 2_f64.powf(zoom)
    }

    /// Converts a screen pixel to map coordinates
    pub fn coordinate_from_pixel(&self, pixel: Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            self.center.x + (pixel.x - self.size.x / 2.0) * resolution,
            self.center.y - (pixel.y - self.size.y / 2.0) * resolution,
        )
    }

    /// Converts map coordinates to a screen pixel
    pub fn pixel_from_coordinate(&self, coordinate: Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            (coordinate.x - self.center.x) / resolution + self.size.x / 2.0,
            (self.center.y - coordinate.y) / resolution + self.size.y / 2.0,
        )
    }

    /// Map extent covered by a square of `tolerance` screen pixels on each
    /// side of `pixel`
    pub fn extent_around_pixel(&self, pixel: Point, tolerance: f64) -> Bounds {
        let lower_left = Point::new(pixel.x - tolerance, pixel.y + tolerance);
        let upper_right = Point::new(pixel.x + tolerance, pixel.y - tolerance);
        Bounds::from_corners(
            self.coordinate_from_pixel(lower_left),
            self.coordinate_from_pixel(upper_right),
        )
    }

    /// The map extent currently visible
    pub fn extent(&self) -> Bounds {
        Bounds::from_corners(
            self.coordinate_from_pixel(Point::new(0.0, self.size.y)),
            self.coordinate_from_pixel(Point::new(self.size.x, 0.0)),
        )
    }

    /// Moves the view by a screen pixel delta, as a drag does
    pub fn pan(&mut self, delta: Point) {
        let resolution = self.resolution();
        let center = Point::new(
            self.center.x - delta.x * resolution,
            self.center.y + delta.y * resolution,
        );
        self.set_center(center);
    }

    /// Starts a property animation alongside any already running
    pub fn animate(&mut self, animation: ViewAnimation) {
        let (from, target) = match animation.target {
            ViewProperty::Center(center) => (
                ViewProperty::Center(self.center),
                ViewProperty::Center(self.constrain_center(center)),
            ),
            ViewProperty::Zoom(zoom) => (
                ViewProperty::Zoom(self.zoom),
                ViewProperty::Zoom(self.constrain_zoom(zoom)),
            ),
        };
        self.animations.start(from, ViewAnimation { target, ..animation });
    }

    /// Animates the center with the view's default duration and easing
    pub fn animate_center(&mut self, center: Point) {
        let animation =
            ViewAnimation::center(center, self.animation_duration, self.animation_easing);
        self.animate(animation);
    }

    /// Animates the zoom with the view's default duration and easing
    pub fn animate_zoom(&mut self, zoom: f64) {
        let animation = ViewAnimation::zoom(zoom, self.animation_duration, self.animation_easing);
        self.animate(animation);
    }

    /// Advances running animations, returning whether the view changed
    pub fn update(&mut self, delta: Duration) -> bool {
        if !self.animations.is_animating() {
            return false;
        }
        for value in self.animations.advance(delta) {
            match value {
                ViewProperty::Center(center) => self.set_center(center),
                ViewProperty::Zoom(zoom) => self.set_zoom(zoom),
            }
        }
        true
    }

    pub fn is_animating(&self) -> bool {
        self.animations.is_animating()
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn cancel_animations(&mut self) {
        self.animations.cancel_all();
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&ViewOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::default();
        assert_eq!(viewport.center(), Point::new(2715.0, 1787.5));
        assert_eq!(viewport.zoom(), 3.4);
        assert_eq!(viewport.size, Point::new(800.0, 600.0));
        assert!(approx(viewport.resolution_for_zoom(0.0), 5430.0 / 256.0));
    }

    #[test]
    fn test_coordinate_conversion() {
        let viewport = Viewport::default();
        let center_pixel = Point::new(400.0, 300.0);
        assert_eq!(viewport.coordinate_from_pixel(center_pixel), viewport.center());

        // screen y grows downwards, map y upwards
        let below = viewport.coordinate_from_pixel(Point::new(400.0, 310.0));
        assert!(below.y < viewport.center().y);

        let coordinate = Point::new(2000.0, 1500.0);
        let back = viewport.coordinate_from_pixel(viewport.pixel_from_coordinate(coordinate));
        assert!(approx(back.x, coordinate.x));
        assert!(approx(back.y, coordinate.y));
    }

    #[test]
    fn test_extent_around_pixel() {
        let viewport = Viewport::default();
        let extent = viewport.extent_around_pixel(Point::new(400.0, 300.0), 30.0);
        assert!(approx(extent.width(), 60.0 * viewport.resolution()));
        assert!(approx(extent.height(), 60.0 * viewport.resolution()));
        assert_eq!(extent.center(), viewport.center());
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom(), 2.0);
        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom(), 5.5);
    }

    #[test]
    fn test_center_constrained() {
        let mut viewport = Viewport::default();
        viewport.set_center(Point::new(0.0, 5000.0));
        assert_eq!(viewport.center(), Point::new(300.0, 3000.0));
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::default();
        let original = viewport.center();
        viewport.pan(Point::new(10.0, 10.0));
        let res = viewport.resolution();
        assert!(approx(viewport.center().x, original.x - 10.0 * res));
        assert!(approx(viewport.center().y, original.y + 10.0 * res));
    }

    #[test]
    fn test_center_and_zoom_animate_together() {
        let mut viewport = Viewport::default();
        viewport.animate_center(Point::new(1000.0, 1000.0));
        viewport.animate_zoom(4.5);
        assert_eq!(viewport.animations().len(), 2);

        assert!(viewport.update(Duration::from_millis(500)));
        assert!(viewport.zoom() > 3.4 && viewport.zoom() < 4.5);
        assert!(viewport.center().x < 2715.0 && viewport.center().x > 1000.0);

        viewport.update(Duration::from_millis(500));
        assert_eq!(viewport.center(), Point::new(1000.0, 1000.0));
        assert_eq!(viewport.zoom(), 4.5);
        assert!(!viewport.is_animating());
        assert!(!viewport.update(Duration::from_millis(16)));
    }
}
