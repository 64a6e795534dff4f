//! Glyph atlas packing
//!
//! Lays the 128 rasterized glyphs out in rows of a single two-channel image.
//! The initial size comes from an area estimate: with `n` rows of height
//! `max_h`, a square-ish atlas needs `n * max_h ≈ total_w / n`, so
//! `n = ceil(sqrt(total_w / max_h))`. The estimate is not a guaranteed fit,
//! so the row walk is simulated and the atlas grows a row at a time until
//! every glyph lands inside it.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use image::{ImageBuffer, LumaA};

use super::{FontError, FontResult, GlyphMetrics, RasterizedGlyph, GLYPH_COUNT};
use crate::foundation::math::{next_pot, Vec2};

/// Luminance written to every atlas texel; text is tinted by the draw color
pub const ATLAS_LUMINANCE: u8 = 0xFF;

/// Floats per baked quad array (4 corners × 2 components)
pub const QUAD_FLOATS: usize = 8;

/// Byte offset of the vertex positions in the glyph vertex buffer
pub const VERTEX_ARRAY_OFFSET: usize = GLYPH_COUNT * QUAD_FLOATS * std::mem::size_of::<f32>();

/// Hard ceiling on either atlas dimension, whatever the configured limit
pub const MAX_ATLAS_DIMENSION: u32 = 16384;

/// Packing constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    /// Round dimensions up to powers of two
    pub require_pot: bool,
    /// Largest accepted width or height, capped at [`MAX_ATLAS_DIMENSION`]
    pub max_size: u32,
}

impl PackOptions {
    /// The size limit actually enforced
    pub fn limit(&self) -> u32 {
        self.max_size.min(MAX_ATLAS_DIMENSION)
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            require_pot: false,
            max_size: 4096,
        }
    }
}

/// Two-channel (luminance, alpha) atlas image ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// `width * height * 2` bytes, rows top to bottom
    pub data: Vec<u8>,
}

impl AtlasImage {
    /// Read the (luminance, alpha) pair at a texel
    pub fn texel(&self, x: u32, y: u32) -> Option<(u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 2) as usize;
        Some((self.data[offset], self.data[offset + 1]))
    }

    /// Write the atlas to a grayscale+alpha PNG for inspection
    pub fn save_png(&self, path: impl AsRef<Path>) -> FontResult<()> {
        let path = path.as_ref();
        let buffer: ImageBuffer<LumaA<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.data.clone())
                .ok_or_else(|| FontError::Export("atlas data does not match its dimensions".to_string()))?;

        buffer
            .save(path)
            .map_err(|e| FontError::Export(format!("{}: {}", path.display(), e)))?;

        log::info!("Atlas written to {}", path.display());
        Ok(())
    }
}

/// Where a glyph landed in the atlas (transient, build time only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    /// Left edge in texels
    pub x: u32,
    /// Top edge in texels
    pub y: u32,
    /// Normalized top-left texture coordinate
    pub uv_origin: Vec2,
    /// Normalized size in texture space
    pub uv_extent: Vec2,
}

impl Default for GlyphPlacement {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            uv_origin: Vec2::zeros(),
            uv_extent: Vec2::zeros(),
        }
    }
}

/// Texture and vertex coordinates of one glyph quad
///
/// Corner order is top-left, top-right, bottom-right, bottom-left. Vertex
/// positions are relative to the pen with +y up, so the bottom edge sits at
/// `bearing_y - height` and every glyph shares the baseline at `y = 0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct GlyphQuad {
    /// Texture coordinates
    pub uv: [f32; QUAD_FLOATS],
    /// Vertex positions
    pub vertices: [f32; QUAD_FLOATS],
}

impl GlyphQuad {
    fn bake(glyph: &RasterizedGlyph, placement: &GlyphPlacement) -> Self {
        let (tx, ty) = (placement.uv_origin.x, placement.uv_origin.y);
        let (tw, th) = (placement.uv_extent.x, placement.uv_extent.y);

        let vx = glyph.bearing_x as f32;
        let vy = (glyph.bearing_y - glyph.height as i32) as f32;
        let vw = glyph.width as f32;
        let vh = glyph.height as f32;

        Self {
            uv: [tx, ty, tx + tw, ty, tx + tw, ty + th, tx, ty + th],
            vertices: [vx, vy + vh, vx + vw, vy + vh, vx + vw, vy, vx, vy],
        }
    }
}

/// Output of [`pack`]
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    /// Image for GPU upload
    pub image: AtlasImage,
    /// Per-glyph rectangles, indexed by code point
    pub placements: [GlyphPlacement; GLYPH_COUNT],
    /// Per-glyph quads, indexed by code point
    pub quads: [GlyphQuad; GLYPH_COUNT],
    /// Per-glyph advances, indexed by code point
    pub metrics: [GlyphMetrics; GLYPH_COUNT],
}

impl PackedAtlas {
    /// Static vertex buffer contents: all texture quads, then all vertex quads
    pub fn vertex_buffer_bytes(&self) -> Vec<u8> {
        let arrays: Vec<[f32; QUAD_FLOATS]> = self
            .quads
            .iter()
            .map(|q| q.uv)
            .chain(self.quads.iter().map(|q| q.vertices))
            .collect();

        bytemuck::cast_slice(&arrays).to_vec()
    }
}

/// Pack rasterized glyphs into one atlas image
///
/// Fails with [`FontError::AtlasOverflow`] when the atlas would exceed
/// [`PackOptions::limit`] in either dimension; nothing is allocated in that
/// case.
pub fn pack(glyphs: &[RasterizedGlyph; GLYPH_COUNT], options: &PackOptions) -> FontResult<PackedAtlas> {
    let max_width = glyphs.iter().map(|g| g.width).max().unwrap_or(0);
    let row_height = glyphs.iter().map(|g| g.height).max().unwrap_or(0);

    // A glyph larger than the limit can never fit; rejecting it here also
    // keeps every offset below in u32 range
    check_size(max_width, row_height, options)?;
    let total_width: u32 = glyphs.iter().map(|g| g.width).sum();

    let (mut width, mut height) = initial_dimensions(total_width, max_width, row_height);
    if options.require_pot {
        width = next_pot(width);
        height = next_pot(height);
    }
    check_size(width, height, options)?;

    // The estimate can come up short; grow until the last row fits
    let origins = row_origins(glyphs, width, row_height);
    for &(_, y) in &origins {
        while y + row_height > height {
            height += row_height;
            if options.require_pot {
                height = next_pot(height);
            }
            log::debug!("Atlas grown to {}x{}", width, height);
            check_size(width, height, options)?;
        }
    }

    let texels = usize::try_from(u64::from(width) * u64::from(height)).map_err(|_| FontError::AtlasOverflow {
        width,
        height,
        limit: options.limit(),
    })?;
    let mut data = [ATLAS_LUMINANCE, 0].repeat(texels);
    let mut placements = [GlyphPlacement::default(); GLYPH_COUNT];
    let mut quads = [GlyphQuad::default(); GLYPH_COUNT];
    let mut metrics = [GlyphMetrics::default(); GLYPH_COUNT];

    for (i, (glyph, &(x_off, y_off))) in glyphs.iter().zip(origins.iter()).enumerate() {
        for y in 0..glyph.height {
            for x in 0..glyph.width {
                let src = (y * glyph.width + x) as usize;
                let dst = (((y_off + y) * width + x_off + x) * 2) as usize;
                data[dst + 1] = glyph.coverage.get(src).copied().unwrap_or(0);
            }
        }

        placements[i] = GlyphPlacement {
            x: x_off,
            y: y_off,
            uv_origin: Vec2::new(x_off as f32 / width as f32, y_off as f32 / height as f32),
            uv_extent: Vec2::new(glyph.width as f32 / width as f32, glyph.height as f32 / height as f32),
        };
        quads[i] = GlyphQuad::bake(glyph, &placements[i]);
        metrics[i] = GlyphMetrics {
            advance_x: glyph.advance_x,
            advance_y: glyph.advance_y,
        };
    }

    log::debug!(
        "Packed {} glyphs into {}x{} (row height {})",
        GLYPH_COUNT,
        width,
        height,
        row_height
    );

    Ok(PackedAtlas {
        image: AtlasImage { width, height, data },
        placements,
        quads,
        metrics,
    })
}

/// Area-estimate starting size
fn initial_dimensions(total_width: u32, max_width: u32, row_height: u32) -> (u32, u32) {
    if total_width == 0 || row_height == 0 {
        return (1, 1);
    }

    let rows = (f64::from(total_width) / f64::from(row_height)).sqrt().ceil().max(1.0);
    let width = (f64::from(total_width) / rows).ceil() as u32 + 1;
    let height = (f64::from(row_height) * rows).ceil() as u32 + 1;

    // A glyph wider than a row could never be placed
    (width.max(max_width + 1), height)
}

/// Top-left corner of every glyph when filling rows left to right
fn row_origins(glyphs: &[RasterizedGlyph; GLYPH_COUNT], width: u32, row_height: u32) -> [(u32, u32); GLYPH_COUNT] {
    let mut origins = [(0, 0); GLYPH_COUNT];
    let (mut x_off, mut y_off) = (0u32, 0u32);

    for (origin, glyph) in origins.iter_mut().zip(glyphs.iter()) {
        if x_off + glyph.width > width {
            x_off = 0;
            y_off += row_height;
        }
        *origin = (x_off, y_off);
        x_off += glyph.width;
    }

    origins
}

fn check_size(width: u32, height: u32, options: &PackOptions) -> FontResult<()> {
    let limit = options.limit();
    if width > limit || height > limit {
        return Err(FontError::AtlasOverflow { width, height, limit });
    }
    Ok(())
}
