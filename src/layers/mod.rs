#[macro_use]
pub mod macros;

pub mod base;
pub mod image;
pub mod manager;
pub mod overlay;
pub mod style;
pub mod vector;
