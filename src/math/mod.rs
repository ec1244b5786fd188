//! Math value types layered on top of glam

mod color;
mod transform;

pub use color::Color;
pub use transform::Transform;
