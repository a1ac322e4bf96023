//! Property animations of the view.
//!
//! Each call to `Viewport::animate` starts one animation of one property.
//! Animations run side by side: a center animation and a zoom animation
//! started back to back overlap, and neither waits for the other.

use crate::animation::easing::EasingType;
use crate::core::geo::Point;
use std::time::Duration;

/// A view property and its value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewProperty {
    Center(Point),
    Zoom(f64),
}

impl ViewProperty {
    fn interpolate(&self, target: &ViewProperty, t: f64) -> ViewProperty {
        match (self, target) {
            (ViewProperty::Center(from), ViewProperty::Center(to)) => {
                ViewProperty::Center(from.lerp(to, t))
            }
            (ViewProperty::Zoom(from), ViewProperty::Zoom(to)) => {
                ViewProperty::Zoom(from + (to - from) * t)
            }
            _ => *target,
        }
    }
}

/// Request to animate one view property towards a target value
#[derive(Debug, Clone, PartialEq)]
pub struct ViewAnimation {
    pub target: ViewProperty,
    pub duration: Duration,
    pub easing: EasingType,
}

impl ViewAnimation {
    pub fn center(center: Point, duration: Duration, easing: EasingType) -> Self {
        Self {
            target: ViewProperty::Center(center),
            duration,
            easing,
        }
    }

    pub fn zoom(zoom: f64, duration: Duration, easing: EasingType) -> Self {
        Self {
            target: ViewProperty::Zoom(zoom),
            duration,
            easing,
        }
    }
}

#[derive(Debug, Clone)]
struct RunningAnimation {
    from: ViewProperty,
    animation: ViewAnimation,
    elapsed: Duration,
}

impl RunningAnimation {
    fn progress(&self) -> f64 {
        if self.animation.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.animation.duration.as_secs_f64()).min(1.0)
    }

    fn value(&self) -> ViewProperty {
        if self.progress() >= 1.0 {
            return self.animation.target;
        }
        let eased = self.animation.easing.apply(self.progress());
        self.from.interpolate(&self.animation.target, eased)
    }
}

/// The set of animations currently running on a view
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    running: Vec<RunningAnimation>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an animation from `from`; other running animations are untouched
    pub fn start(&mut self, from: ViewProperty, animation: ViewAnimation) {
        self.running.push(RunningAnimation {
            from,
            animation,
            elapsed: Duration::ZERO,
        });
    }

    /// Advances every animation by `delta` and returns the property values to
    /// apply, in start order. Finished animations report their target once
    /// and are dropped.
    pub fn advance(&mut self, delta: Duration) -> Vec<ViewProperty> {
        let mut values = Vec::with_capacity(self.running.len());
        for running in &mut self.running {
            running.elapsed += delta;
            values.push(running.value());
        }
        self.running.retain(|running| running.progress() < 1.0);
        values
    }

    /// Targets of the running animations, in start order
    pub fn targets(&self) -> Vec<&ViewAnimation> {
        self.running.iter().map(|r| &r.animation).collect()
    }

    pub fn is_animating(&self) -> bool {
        !self.running.is_empty()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn cancel_all(&mut self) {
        self.running.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_animations_overlap() {
        let mut set = AnimationSet::new();
        set.start(
            ViewProperty::Center(Point::new(0.0, 0.0)),
            ViewAnimation::center(Point::new(100.0, 100.0), ms(1000), EasingType::Linear),
        );
        set.start(
            ViewProperty::Zoom(3.0),
            ViewAnimation::zoom(4.0, ms(500), EasingType::Linear),
        );

        let values = set.advance(ms(250));
        assert_eq!(
            values,
            vec![
                ViewProperty::Center(Point::new(25.0, 25.0)),
                ViewProperty::Zoom(3.5)
            ]
        );

        let values = set.advance(ms(250));
        assert_eq!(values[1], ViewProperty::Zoom(4.0));
        // the zoom animation finished, the center one keeps going
        assert_eq!(set.len(), 1);

        let values = set.advance(ms(600));
        assert_eq!(values, vec![ViewProperty::Center(Point::new(100.0, 100.0))]);
        assert!(!set.is_animating());
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut set = AnimationSet::new();
        set.start(
            ViewProperty::Zoom(2.0),
            ViewAnimation::zoom(5.0, Duration::ZERO, EasingType::InAndOut),
        );
        assert_eq!(set.advance(Duration::ZERO), vec![ViewProperty::Zoom(5.0)]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut set = AnimationSet::new();
        set.start(
            ViewProperty::Zoom(2.0),
            ViewAnimation::zoom(5.0, ms(100), EasingType::Linear),
        );
        set.cancel_all();
        assert!(set.advance(ms(10)).is_empty());
    }
}
