//! Math utilities and types
//!
//! Provides the small set of math types the text pipeline works in: UI-space
//! pen positions and RGBA color vectors.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Smallest power of two greater than or equal to `value` (1 for 0)
pub fn next_pot(value: u32) -> u32 {
    value.max(1).next_power_of_two()
}
