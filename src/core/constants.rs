//! Fixed dimensions and interaction numbers of the campus map image.

/// Width of the map image in pixels.
pub const MAP_WIDTH: f64 = 5430.0;

/// Height of the map image in pixels. Location data counts y downwards from
/// the top edge; the engine counts it upwards, so `engine_y = MAP_HEIGHT - y`.
pub const MAP_HEIGHT: f64 = 3575.0;

/// Screen tile size used to derive the resolution at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Half-width, in screen pixels, of the rectangle searched around a click.
pub const CLICK_TOLERANCE_PX: f64 = 30.0;

/// Zoom the view animates to when a marker is placed with centering.
pub const SELECTION_ZOOM: f64 = 4.5;

/// Where the selection marker is parked when nothing is selected.
pub const OFFSCREEN_MARKER: (f64, f64) = (-50.0, -50.0);

/// Marker icons appear from this zoom on.
pub const ICON_MIN_ZOOM: f64 = 3.0;

/// Marker labels appear from this zoom on.
pub const LABEL_MIN_ZOOM: f64 = 4.0;

/// Label font size per zoom level.
pub const LABEL_FONT_SCALE: f64 = 3.0;

/// Group classifier of residence buildings.
pub const RESIDENCE_GROUP: i32 = 3;

/// Short-name value meaning "no short name".
pub const NO_SHORT_NAME: &str = "0";

/// Layer ids used by the controller.
pub const BASE_IMAGE_LAYER_ID: &str = "campus-image";
pub const LOCATIONS_LAYER_ID: &str = "locations";
