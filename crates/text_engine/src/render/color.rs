//! RGBA colors used for text tinting

use crate::foundation::math::Vec4;
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Opaque white, the draw color when none is given
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Built-in red selected by the `r` directive
    pub const RED: Self = Self::rgba(0.8, 0.2, 0.2, 1.0);
    /// Built-in green selected by the `g` directive
    pub const GREEN: Self = Self::rgba(0.2, 0.8, 0.2, 1.0);
    /// Built-in blue selected by the `b` directive
    pub const BLUE: Self = Self::rgba(0.2, 0.2, 0.8, 1.0);

    /// Create a color from components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Components as a 4-vector
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }
}

impl From<Color> for Vec4 {
    fn from(c: Color) -> Self {
        c.to_vec4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_keeps_rgb() {
        let c = Color::RED.with_alpha(0.25);
        assert_eq!((c.r, c.g, c.b, c.a), (0.8, 0.2, 0.2, 0.25));
    }

    #[test]
    fn test_vec4_conversion() {
        let v: Vec4 = Color::BLUE.into();
        assert_eq!(Color::from(v), Color::BLUE);
        assert_eq!(Color::default(), Color::WHITE);
    }
}
