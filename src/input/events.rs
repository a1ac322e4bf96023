use crate::{
    core::geo::{PixelPoint, Point},
    data::locations::Location,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pointer input delivered by the host, positions in screen pixels relative
/// to the map element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap
    Click { position: Point },
    /// Pointer moved without a button held
    PointerMove { position: Point },
    /// Drag in progress; `delta` is the pointer movement since the last one
    Drag { delta: Point },
    /// Map element resized
    Resize { size: Point },
}

/// Events the map emits to its listeners
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A click selected a location, or cleared the selection with `None`
    LocationSelected { location: Option<Arc<Location>> },
    /// The view started or stopped following the GPS position
    FollowingChanged { following: bool },
    /// The low resolution base image finished loading
    Loaded,
    /// The full resolution base image replaced the low resolution one
    HighResolutionLoaded,
    /// An accepted GPS reading moved the user marker
    PositionChanged { pixel: PixelPoint },
    /// Tracking was requested on a host without geolocation
    GeolocationUnavailable,
}

impl MapEvent {
    /// Name listeners subscribe to
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::LocationSelected { .. } => "select",
            MapEvent::FollowingChanged { .. } => "followingchange",
            MapEvent::Loaded => "loaded",
            MapEvent::HighResolutionLoaded => "highresloaded",
            MapEvent::PositionChanged { .. } => "position",
            MapEvent::GeolocationUnavailable => "geolocationunavailable",
        }
    }
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position } | InputEvent::PointerMove { position } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Checks if this is a mouse/pointer event
    pub fn is_pointer_event(&self) -> bool {
        !matches!(self, InputEvent::Resize { .. })
    }
}
