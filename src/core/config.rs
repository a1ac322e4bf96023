//! Configuration supplied once at initialization.
//!
//! `MapConfig` names the assets and document elements the map binds to and is
//! usually deserialized from the host's JSON. `ViewOptions`,
//! `InteractionOptions` and `GpsBounds` carry the tuning numbers of the view,
//! the click/selection behaviour and the GPS plausibility window; their
//! defaults reproduce the behaviour of the deployed campus map.

use crate::{
    animation::easing::EasingType,
    core::{
        bounds::Bounds,
        constants::{
            CLICK_TOLERANCE_PX, MAP_HEIGHT, MAP_WIDTH, OFFSCREEN_MARKER, SELECTION_ZOOM,
        },
        geo::{PixelPoint, Point},
    },
    Result,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Asset locations and document element ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Full resolution map image
    #[serde(rename = "mapPath", alias = "map_path")]
    pub map_path: String,
    /// Low resolution map image shown while the full one loads
    #[serde(rename = "mapMinPath", alias = "map_min_path")]
    pub map_min_path: String,
    /// Prefix of the marker icon assets
    #[serde(rename = "markersBase", alias = "markers_base")]
    pub markers_base: String,
    /// Attribution text shown with the base image
    #[serde(default)]
    pub attributions: String,
    /// Element hosting the map canvas
    pub map_id: String,
    /// Element used as the selection marker
    pub marker_id: String,
    /// Element used as the user position marker
    pub user_marker_id: String,
}

impl MapConfig {
    /// Parses a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// View defaults: zoom limits, initial zoom and the extent the center may roam
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    /// Extent of the local pixel projection
    pub projection_extent: Bounds,
    /// The view center is kept inside this extent
    pub center_extent: Bounds,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Screen size of the map element in pixels
    pub size: Point,
    pub animation_duration: Duration,
    pub animation_easing: EasingType,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            projection_extent: Bounds::from_coords(0.0, 0.0, MAP_WIDTH, MAP_HEIGHT),
            center_extent: Bounds::from_coords(300.0, 300.0, 5000.0, 3000.0),
            initial_zoom: 3.4,
            min_zoom: 2.0,
            max_zoom: 5.5,
            size: Point::new(800.0, 600.0),
            animation_duration: Duration::from_millis(1000),
            animation_easing: EasingType::InAndOut,
        }
    }
}

/// Click and selection behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionOptions {
    /// Half-size of the screen rectangle searched around a click
    pub click_tolerance_px: f64,
    /// Zoom reached when centering on a marker
    pub selection_zoom: f64,
    /// Image pixel position of the selection marker when nothing is selected
    pub offscreen_marker: Point,
    /// Screen radius within which a rendered marker counts as hovered
    pub hit_radius_px: f64,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            click_tolerance_px: CLICK_TOLERANCE_PX,
            selection_zoom: SELECTION_ZOOM,
            offscreen_marker: Point::new(OFFSCREEN_MARKER.0, OFFSCREEN_MARKER.1),
            hit_radius_px: 12.0,
        }
    }
}

/// Window of converted GPS pixels accepted as plausible (exclusive on all sides)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsBounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    /// 5375 by default, looser than the image height
    pub max_y: i64,
}

impl GpsBounds {
    pub fn is_plausible(&self, pixel: PixelPoint) -> bool {
        pixel.x > self.min_x && pixel.y > self.min_y && pixel.x < self.max_x && pixel.y < self.max_y
    }
}

impl Default for GpsBounds {
    fn default() -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: 5430,
            max_y: 5375,
        }
    }
}
