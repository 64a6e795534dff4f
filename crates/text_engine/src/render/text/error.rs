//! Errors raised while building fonts or laying out text

use crate::render::BackendError;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Font bytes could not be parsed; fatal for that font
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// A single code point could not be rasterized; recovered with a placeholder
    #[error("Failed to rasterize glyph {code_point}: {reason}")]
    GlyphRaster {
        /// Code point that failed
        code_point: u8,
        /// Why the rasterizer refused it
        reason: String,
    },

    /// Glyphs do not fit in an atlas within the size limit
    #[error("Glyph atlas of {width}x{height} exceeds the {limit}px limit")]
    AtlasOverflow {
        /// Atlas width at the point of failure
        width: u32,
        /// Atlas height at the point of failure
        height: u32,
        /// Configured maximum dimension
        limit: u32,
    },

    /// Text contains a byte outside the 0-127 glyph range
    #[error("Byte 0x{byte:02x} at index {index} has no glyph")]
    Encoding {
        /// Offending byte
        byte: u8,
        /// Position in the text
        index: usize,
    },

    /// The rendering backend refused a resource
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Atlas image could not be written out
    #[error("Failed to export atlas: {0}")]
    Export(String),
}
