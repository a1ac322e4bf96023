pub mod easing;
pub mod view;

// Re-export commonly used types and functions for convenience
pub use easing::EasingType;
pub use view::{AnimationSet, ViewAnimation, ViewProperty};
