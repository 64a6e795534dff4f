//! Synthetic glyph source for tests
//!
//! Advances are fixed per character class so expected widths can be worked
//! out by hand: letters and digits 10px, space 5px, punctuation 6px.

use super::{
    rasterize_repertoire, BuildOptions, CodePoint, FontError, FontResource, FontResult, GlyphRasterizer,
    RasterizedGlyph, GLYPH_COUNT,
};
use crate::render::TextBackend;

/// DejaVu Sans, for tests that need real outlines
pub const DEJAVU_SANS: &[u8] = include_bytes!("../../../tests/fixtures/DejaVuSans.ttf");

/// Requested height of fixture fonts
pub const TEST_FONT_HEIGHT: u32 = 12;

/// Advance of letters and digits
pub const LETTER_ADVANCE: u32 = 10;

/// Advance of the space glyph
pub const SPACE_ADVANCE: u32 = 5;

/// Advance of punctuation
pub const PUNCT_ADVANCE: u32 = 6;

/// Rasterizer with hand-checkable metrics
#[derive(Debug, Default)]
pub struct FixedAdvanceRasterizer {
    refused: Vec<u8>,
}

impl FixedAdvanceRasterizer {
    /// Rasterizer that renders every printable code point
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a raster failure for `byte`
    pub fn refusing(mut self, byte: u8) -> Self {
        self.refused.push(byte);
        self
    }
}

impl GlyphRasterizer for FixedAdvanceRasterizer {
    fn rasterize(&self, code_point: CodePoint, _pixel_height: f32) -> FontResult<RasterizedGlyph> {
        let ch = char::from(code_point);
        if ch.is_ascii_control() || self.refused.contains(&code_point.byte()) {
            return Err(FontError::GlyphRaster {
                code_point: code_point.byte(),
                reason: "fixture refuses it".to_string(),
            });
        }

        let glyph = match ch {
            ' ' => RasterizedGlyph {
                advance_x: SPACE_ADVANCE,
                ..RasterizedGlyph::placeholder()
            },
            'g' | 'j' | 'p' | 'q' | 'y' => RasterizedGlyph {
                bearing_y: 5,
                advance_x: LETTER_ADVANCE,
                ..solid_glyph(8, 8, 0xFF)
            },
            c if c.is_ascii_lowercase() => RasterizedGlyph {
                advance_x: LETTER_ADVANCE,
                ..solid_glyph(8, 7, 0xFF)
            },
            c if c.is_ascii_alphanumeric() => RasterizedGlyph {
                advance_x: LETTER_ADVANCE,
                ..solid_glyph(8, 10, 0xFF)
            },
            _ => RasterizedGlyph {
                bearing_x: 1,
                advance_x: PUNCT_ADVANCE,
                ..solid_glyph(4, 4, 0xC0)
            },
        };
        Ok(glyph)
    }
}

/// Glyph with uniform coverage sitting on the baseline
pub fn solid_glyph(width: u32, height: u32, coverage: u8) -> RasterizedGlyph {
    RasterizedGlyph {
        width,
        height,
        bearing_x: 0,
        bearing_y: height as i32,
        advance_x: width + 1,
        advance_y: 0,
        coverage: vec![coverage; (width * height) as usize],
    }
}

/// The fixture repertoire, rasterized
pub fn fixed_glyphs() -> [RasterizedGlyph; GLYPH_COUNT] {
    rasterize_repertoire(&FixedAdvanceRasterizer::new(), TEST_FONT_HEIGHT as f32).unwrap()
}

/// Fixture font uploaded to `backend`
pub fn test_font<B: TextBackend + ?Sized>(backend: &mut B) -> FontResource {
    FontResource::build_with(backend, &FixedAdvanceRasterizer::new(), TEST_FONT_HEIGHT, &BuildOptions::default())
        .unwrap()
}
