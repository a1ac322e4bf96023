//! Base map image loading.

pub mod loader;
pub mod progressive;

pub use loader::{HttpImageLoader, ImageData, ImageLoader};
pub use progressive::{LoadStage, ProgressiveImage};
