//! RGBA tint color
//!
//! Colors multiply component-wise when cascading down the hierarchy, so
//! opaque white is the identity tint.

use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGBA color with `f32` channels in `[0, 1]`.
///
/// Laid out as four consecutive floats so cascade colors can be uploaded to
/// the GPU without conversion.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque white, the identity tint
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from all four channels
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Return a copy with the alpha channel replaced
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Return a copy with the RGB channels replaced, keeping alpha
    #[must_use]
    pub const fn with_rgb(self, rgb: Vec3) -> Self {
        Self::new(rgb.x, rgb.y, rgb.z, self.a)
    }

    /// RGB channels as a vector
    #[must_use]
    pub const fn to_rgb_vec(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Whether this is exactly opaque white.
    #[must_use]
    #[inline]
    pub fn is_white(&self) -> bool {
        *self == Self::WHITE
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Mul for Color {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.r * rhs.r,
            self.g * rhs.g,
            self.b * rhs.b,
            self.a * rhs.a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mul_is_component_wise() {
        let a = Color::new(0.5, 1.0, 0.25, 0.5);
        let b = Color::new(0.5, 0.5, 1.0, 0.5);

        assert_eq!(a * b, Color::new(0.25, 0.5, 0.25, 0.25));
    }

    #[test]
    fn test_white_is_identity() {
        let c = Color::new(0.2, 0.4, 0.6, 0.8);
        assert_eq!(c * Color::WHITE, c);
        assert!(Color::default().is_white());
        assert!(!Color::WHITE.with_alpha(0.5).is_white());
    }

    #[test]
    fn test_rgb_helpers_keep_alpha() {
        let c = Color::WHITE
            .with_alpha(0.5)
            .with_rgb(Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(c.to_rgb_vec(), Vec3::X);
    }

    #[test]
    fn test_color_is_gpu_layout() {
        let c = Color::new(1.0, 2.0, 3.0, 4.0);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&c));

        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
