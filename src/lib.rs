//! # campusmap
//!
//! An interactive campus map engine. A static, image-based map is overlaid
//! with named location markers; clicks select the nearest marker, the view
//! animates to it, and the user's live position is tracked by converting
//! device latitude/longitude into the image's pixel space with a fitted
//! polynomial regression.
//!
//! The host supplies the document surface (element lookup, cursor style)
//! and the geolocation watch; the engine produces draw commands each frame.

pub mod animation;
pub mod assets;
pub mod controller;
pub mod core;
pub mod data;
pub mod geolocation;
pub mod input;
pub mod layers;
pub mod platform;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    builder::CampusMapBuilder,
    config::{GpsBounds, InteractionOptions, MapConfig, ViewOptions},
    geo::{LatLng, PixelPoint, Point},
    map::Map,
    viewport::Viewport,
};

pub use assets::{HttpImageLoader, ImageLoader, LoadStage};

pub use controller::CampusMap;

pub use data::locations::{Location, LocationSet};

pub use geolocation::{
    model::CoordinateModel,
    tracker::{GpsTracker, TrackingState},
    watch::{ChannelGeolocation, Geolocation, Position, PositionOptions, PositionWatch},
};

pub use input::events::{InputEvent, MapEvent};

pub use layers::{
    base::LayerTrait, image::ImageLayer, overlay::Overlay, style::MarkerStyle,
    vector::VectorLayer,
};

pub use platform::{Cursor, Document, MemoryDocument};

pub use rendering::context::{DrawCommand, RenderContext};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Element not found in document: {0}")]
    ElementNotFound(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("Geolocation error: {0}")]
    Geolocation(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Initialise `env_logger` output, honouring `RUST_LOG`. Safe to call more
/// than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
