//! Continuous position watch.
//!
//! A watch is a subscription: the provider pushes readings as the device
//! reports them and the subscriber consumes a lazy, unbounded stream of
//! `Position`s until it cancels the watch.

use crate::{core::geo::LatLng, MapError, Result};
use futures::{
    channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender},
    FutureExt, Stream, StreamExt,
};
use std::{
    pin::Pin,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex,
    },
    task::{Context, Poll},
    time::Duration,
};

/// Options passed to the provider when a watch is registered
#[derive(Debug, Clone, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Longest wait for a reading; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Oldest cached reading the provider may report
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: None,
            maximum_age: Duration::ZERO,
        }
    }
}

/// One device reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coords: LatLng,
    /// Accuracy radius in meters, 0 when unknown
    pub accuracy: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            coords: LatLng::new(lat, lng),
            accuracy: 0.0,
            timestamp: 0,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }
}

/// A device geolocation capability
pub trait Geolocation: Send + Sync {
    /// Whether the platform can provide positions at all
    fn is_available(&self) -> bool {
        true
    }

    /// Registers a continuous watch
    fn watch_position(&self, options: &PositionOptions) -> Result<PositionWatch>;
}

/// Live subscription to position readings
#[derive(Debug)]
pub struct PositionWatch {
    id: u32,
    receiver: UnboundedReceiver<Position>,
}

impl PositionWatch {
    pub fn new(id: u32, receiver: UnboundedReceiver<Position>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Next buffered reading without waiting. `Ok(None)` means nothing is
    /// pending; an error means the provider closed the watch.
    pub fn try_next(&mut self) -> Result<Option<Position>> {
        match self.receiver.next().now_or_never() {
            None => Ok(None),
            Some(Some(position)) => Ok(Some(position)),
            Some(None) => Err(MapError::Geolocation(format!(
                "watch {} closed by provider",
                self.id
            ))),
        }
    }

    /// Stops delivery. Readings already buffered can still be drained.
    pub fn cancel(&mut self) {
        log::debug!("cancelling position watch {}", self.id);
        self.receiver.close();
    }
}

impl Stream for PositionWatch {
    type Item = Position;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

type Subscribers = Arc<Mutex<Vec<UnboundedSender<Position>>>>;

/// Channel-backed geolocation. Hosts bridge their platform callback into
/// a `PositionFeeder`; tests push synthetic readings the same way.
#[derive(Debug, Clone)]
pub struct ChannelGeolocation {
    subscribers: Subscribers,
    next_id: Arc<AtomicU32>,
    available: bool,
}

impl ChannelGeolocation {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::default(),
            next_id: Arc::new(AtomicU32::new(1)),
            available: true,
        }
    }

    /// A platform that reports no geolocation capability
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Handle used to push readings to every open watch
    pub fn feeder(&self) -> PositionFeeder {
        PositionFeeder {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl Default for ChannelGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Geolocation for ChannelGeolocation {
    fn is_available(&self) -> bool {
        self.available
    }

    fn watch_position(&self, options: &PositionOptions) -> Result<PositionWatch> {
        if !self.available {
            return Err(MapError::Geolocation("geolocation unavailable".to_string()));
        }
        let (sender, receiver) = unbounded();
        self.subscribers
            .lock()
            .map_err(|_| MapError::Geolocation("subscriber list poisoned".to_string()))?
            .push(sender);

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        log::info!(
            "registered position watch {} (high accuracy: {})",
            id,
            options.enable_high_accuracy
        );
        Ok(PositionWatch::new(id, receiver))
    }
}

/// Pushes readings into the watches of a `ChannelGeolocation`
#[derive(Debug, Clone)]
pub struct PositionFeeder {
    subscribers: Subscribers,
}

impl PositionFeeder {
    /// Delivers a reading to every open watch and returns how many got it.
    /// Cancelled watches are forgotten.
    pub fn push(&self, position: Position) -> usize {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return 0;
        };
        subscribers.retain(|sender| sender.unbounded_send(position).is_ok());
        subscribers.len()
    }

    /// Closes every watch, as a provider does when permission is revoked
    pub fn close(&self) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.clear();
        }
    }
}
