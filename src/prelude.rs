//! Prelude module for common campus map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use campusmap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    builder::CampusMapBuilder,
    config::{GpsBounds, InteractionOptions, MapConfig, ViewOptions},
    geo::{LatLng, PixelPoint, Point},
    map::Map,
    viewport::Viewport,
};

pub use crate::controller::CampusMap;

pub use crate::data::locations::{Location, LocationSet};

pub use crate::layers::{
    base::LayerTrait,
    image::ImageLayer,
    manager::LayerManager,
    overlay::Overlay,
    style::{MarkerStyle, StyleFunction},
    vector::VectorLayer,
};

pub use crate::input::events::{InputEvent, MapEvent};

pub use crate::animation::{easing::EasingType, view::ViewAnimation};

pub use crate::geolocation::{
    model::CoordinateModel,
    tracker::{GpsTracker, TrackingState},
    watch::{Geolocation, Position, PositionOptions},
};

pub use crate::assets::{loader::ImageLoader, progressive::LoadStage};

pub use crate::platform::{Cursor, Document};

pub use crate::spatial::index::{SpatialIndex, SpatialItem};

pub use crate::{MapError, Result};

pub use std::sync::Arc;

pub use std::time::Duration;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
