//! GPS support: converting readings to map pixels and tracking the user.

pub mod model;
pub mod tracker;
pub mod watch;

pub use model::{AxisModel, CoordinateModel};
pub use tracker::{Fix, GpsTracker, StartOutcome, TrackingState};
pub use watch::{
    ChannelGeolocation, Geolocation, Position, PositionFeeder, PositionOptions, PositionWatch,
};
