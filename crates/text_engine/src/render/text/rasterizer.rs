//! Glyph rasterization
//!
//! Wraps the vector font library behind [`GlyphRasterizer`] so the atlas
//! builder only ever sees owned coverage bitmaps and integer metrics.

use fontdue::{Font, FontSettings};

use super::{CodePoint, FontError, FontResult};

/// A rasterized glyph, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterizedGlyph {
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Offset from the pen to the left edge of the bitmap
    pub bearing_x: i32,
    /// Offset from the baseline up to the top edge of the bitmap
    pub bearing_y: i32,
    /// Horizontal pen advance
    pub advance_x: u32,
    /// Vertical pen advance
    pub advance_y: u32,
    /// 8-bit coverage, `width * height` bytes, rows top to bottom
    pub coverage: Vec<u8>,
}

impl RasterizedGlyph {
    /// Zero-area, zero-advance stand-in for a glyph that failed to rasterize
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Whether the glyph has no ink
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Source of glyph bitmaps for the atlas builder
pub trait GlyphRasterizer {
    /// Rasterize `code_point` at `pixel_height`
    ///
    /// Returns [`FontError::GlyphRaster`] when the font cannot render the code
    /// point; callers recover by substituting [`RasterizedGlyph::placeholder`].
    fn rasterize(&self, code_point: CodePoint, pixel_height: f32) -> FontResult<RasterizedGlyph>;
}

/// [`GlyphRasterizer`] over a TrueType/OpenType font parsed by `fontdue`
pub struct FontdueRasterizer {
    font: Font,
}

impl FontdueRasterizer {
    /// Parse font file bytes
    ///
    /// # Example
    ///
    /// ```no_run
    /// use text_engine::render::text::FontdueRasterizer;
    ///
    /// let font_bytes = std::fs::read("dat/font.ttf")?;
    /// let rasterizer = FontdueRasterizer::from_bytes(&font_bytes)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_bytes(font_data: &[u8]) -> FontResult<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::FontLoad(format!("fontdue error: {}", e)))?;

        log::debug!("Parsed font with {} glyphs", font.glyph_count());
        Ok(Self { font })
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn rasterize(&self, code_point: CodePoint, pixel_height: f32) -> FontResult<RasterizedGlyph> {
        let ch = char::from(code_point);

        if ch.is_ascii_control() {
            return Err(FontError::GlyphRaster {
                code_point: code_point.byte(),
                reason: "control character".to_string(),
            });
        }

        if self.font.lookup_glyph_index(ch) == 0 {
            return Err(FontError::GlyphRaster {
                code_point: code_point.byte(),
                reason: "not in the font's character map".to_string(),
            });
        }

        let (metrics, bitmap) = self.font.rasterize(ch, pixel_height);

        Ok(RasterizedGlyph {
            width: metrics.width as u32,
            height: metrics.height as u32,
            bearing_x: metrics.xmin,
            bearing_y: metrics.ymin + metrics.height as i32,
            advance_x: metrics.advance_width.round().max(0.0) as u32,
            // Horizontal layout only; the pen never moves vertically
            advance_y: 0,
            coverage: bitmap,
        })
    }
}
