use crate::{
    core::{config::GpsBounds, geo::PixelPoint},
    geolocation::{
        model::CoordinateModel,
        watch::{Geolocation, Position, PositionOptions, PositionWatch},
    },
    Result,
};
use futures::StreamExt;

/// Whether a position watch is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Unstarted,
    Watching,
}

/// What a start request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The platform has no geolocation; nothing changed
    Unsupported,
    /// A new watch was registered
    Started,
    /// A watch already existed; the caller should recenter on this reading
    Recentered(Option<PixelPoint>),
}

/// An accepted reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fix {
    pub pixel: PixelPoint,
    /// Whether the view should follow the reading
    pub recenter: bool,
}

/// GPS tracking state machine.
///
/// `Unstarted -> Watching` on the first successful start; further starts stay
/// in `Watching`. Following is an orthogonal flag: starting sets it, a manual
/// drag clears it, and it only decides whether fixes recenter the view.
#[derive(Debug)]
pub struct GpsTracker {
    model: CoordinateModel,
    bounds: GpsBounds,
    options: PositionOptions,
    watch: Option<PositionWatch>,
    following: bool,
    last_known: Option<PixelPoint>,
}

impl GpsTracker {
    pub fn new(model: CoordinateModel, bounds: GpsBounds) -> Self {
        Self {
            model,
            bounds,
            options: PositionOptions::default(),
            watch: None,
            following: false,
            last_known: None,
        }
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> TrackingState {
        if self.watch.is_some() {
            TrackingState::Watching
        } else {
            TrackingState::Unstarted
        }
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Sets the following flag, returning whether it changed
    pub fn set_following(&mut self, following: bool) -> bool {
        let changed = self.following != following;
        self.following = following;
        changed
    }

    /// Last accepted reading, in image pixels
    pub fn last_known(&self) -> Option<PixelPoint> {
        self.last_known
    }

    pub fn model(&self) -> &CoordinateModel {
        &self.model
    }

    /// Starts following, registering a watch unless one exists
    pub fn start(&mut self, geolocation: Option<&dyn Geolocation>) -> Result<StartOutcome> {
        let Some(geolocation) = geolocation.filter(|g| g.is_available()) else {
            log::debug!("geolocation unavailable, not tracking");
            return Ok(StartOutcome::Unsupported);
        };

        if self.watch.is_some() {
            self.following = true;
            return Ok(StartOutcome::Recentered(self.last_known));
        }

        // a refused watch leaves following untouched
        self.watch = Some(geolocation.watch_position(&self.options)?);
        self.following = true;
        Ok(StartOutcome::Started)
    }

    /// Converts a reading; implausible pixels are dropped as sensor noise
    pub fn accept(&mut self, position: &Position) -> Option<Fix> {
        let pixel = self.model.to_pixel(position.coords);
        if !self.bounds.is_plausible(pixel) {
            log::warn!(
                "discarding reading {:?} -> ({}, {}) outside the map",
                position.coords,
                pixel.x,
                pixel.y
            );
            return None;
        }

        log::debug!("gps fix at ({}, {})", pixel.x, pixel.y);
        self.last_known = Some(pixel);
        Some(Fix {
            pixel,
            recenter: self.following,
        })
    }

    /// Drains readings delivered since the last poll, in arrival order
    pub fn poll(&mut self) -> Vec<Fix> {
        let mut positions = Vec::new();
        if let Some(watch) = self.watch.as_mut() {
            loop {
                match watch.try_next() {
                    Ok(Some(position)) => positions.push(position),
                    Ok(None) => break,
                    Err(e) => {
                        log::warn!("{}", e);
                        self.watch = None;
                        break;
                    }
                }
            }
        }
        positions.iter().filter_map(|p| self.accept(p)).collect()
    }

    /// Waits for the next reading of the watch. `None` once the watch is
    /// gone, either never started or closed by the provider.
    pub async fn next_reading(&mut self) -> Option<Position> {
        let reading = self.watch.as_mut()?.next().await;
        if reading.is_none() {
            log::info!("position watch ended");
            self.watch = None;
        }
        reading
    }

    /// Cancels the watch. The last known reading is kept.
    pub fn stop(&mut self) -> bool {
        match self.watch.take() {
            Some(mut watch) => {
                watch.cancel();
                log::info!("stopped position watch {}", watch.id());
                true
            }
            None => false,
        }
    }
}

impl Default for GpsTracker {
    fn default() -> Self {
        Self::new(CoordinateModel::campus(), GpsBounds::default())
    }
}
