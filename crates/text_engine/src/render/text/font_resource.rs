//! Loaded fonts
//!
//! A [`FontResource`] is built once per (font bytes, pixel height) pair and is
//! immutable afterwards. It owns the atlas texture and the static glyph
//! vertex buffer; both are released by [`FontResource::destroy`].

use super::atlas_packer::{self, PackOptions, PackedAtlas};
use super::{
    CodePoint, FontError, FontResult, FontdueRasterizer, GlyphQuad, GlyphRasterizer, RasterizedGlyph,
    GLYPH_COUNT,
};
use crate::render::{BufferHandle, TextBackend, TextureHandle, TextureParams};

/// Pen advance of one glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    /// Horizontal advance in pixels
    pub advance_x: u32,
    /// Vertical advance in pixels
    pub advance_y: u32,
}

/// Settings for building one font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Display scaling applied to the requested height
    pub ui_scale: f32,
    /// Round atlas dimensions up to powers of two
    pub require_pot: bool,
    /// Largest accepted atlas width or height, capped by the packer
    pub max_atlas_size: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            require_pot: false,
            max_atlas_size: 4096,
        }
    }
}

impl BuildOptions {
    /// Line height for a requested pixel height: `floor(height * ui_scale)`
    pub fn line_height(&self, height: u32) -> u32 {
        (height as f32 * self.ui_scale).floor().max(0.0) as u32
    }

    /// Constraints handed to the atlas packer
    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            require_pot: self.require_pot,
            max_size: self.max_atlas_size,
        }
    }
}

/// A font ready for layout and rendering
#[derive(Debug)]
pub struct FontResource {
    line_height: u32,
    glyphs: [GlyphMetrics; GLYPH_COUNT],
    quads: [GlyphQuad; GLYPH_COUNT],
    atlas_size: (u32, u32),
    texture: Option<TextureHandle>,
    vertex_buffer: Option<BufferHandle>,
}

impl FontResource {
    /// Build a font from TrueType/OpenType bytes
    ///
    /// # Arguments
    ///
    /// * `backend` - Receives the atlas texture and glyph vertex buffer
    /// * `font_data` - Raw font file bytes
    /// * `height` - Requested pixel height before UI scaling
    /// * `options` - Scaling and atlas constraints
    pub fn build<B: TextBackend + ?Sized>(
        backend: &mut B,
        font_data: &[u8],
        height: u32,
        options: &BuildOptions,
    ) -> FontResult<Self> {
        let rasterizer = FontdueRasterizer::from_bytes(font_data)?;
        Self::build_with(backend, &rasterizer, height, options)
    }

    /// Build a font from any glyph source
    ///
    /// Everything that can fail on the CPU (rasterizing, packing) happens
    /// before the first backend call, so a failed build leaves no GPU state.
    pub fn build_with<B, R>(backend: &mut B, rasterizer: &R, height: u32, options: &BuildOptions) -> FontResult<Self>
    where
        B: TextBackend + ?Sized,
        R: GlyphRasterizer + ?Sized,
    {
        let line_height = options.line_height(height);
        if line_height == 0 {
            return Err(FontError::FontLoad(format!(
                "height {} at scale {} rounds to zero pixels",
                height, options.ui_scale
            )));
        }

        let glyphs = rasterize_repertoire(rasterizer, line_height as f32)?;
        let atlas = atlas_packer::pack(&glyphs, &options.pack_options())?;
        drop(glyphs);

        let font = Self::upload(backend, &atlas, line_height)?;
        log::info!(
            "Font built at {}px: {}x{} atlas, {} glyphs",
            line_height,
            atlas.image.width,
            atlas.image.height,
            GLYPH_COUNT
        );
        Ok(font)
    }

    fn upload<B: TextBackend + ?Sized>(backend: &mut B, atlas: &PackedAtlas, line_height: u32) -> FontResult<Self> {
        let texture = backend.create_texture(&atlas.image, TextureParams::glyph_atlas())?;

        let vertex_buffer = match backend.create_static_buffer(&atlas.vertex_buffer_bytes()) {
            Ok(buffer) => buffer,
            Err(e) => {
                backend.delete_texture(texture);
                log::error!("Glyph vertex buffer upload failed: {}", e);
                return Err(e.into());
            }
        };

        Ok(Self {
            line_height,
            glyphs: atlas.metrics,
            quads: atlas.quads,
            atlas_size: (atlas.image.width, atlas.image.height),
            texture: Some(texture),
            vertex_buffer: Some(vertex_buffer),
        })
    }

    /// Release the atlas texture and vertex buffer
    ///
    /// Calling this again is a no-op.
    pub fn destroy<B: TextBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(texture) = self.texture.take() {
            backend.delete_texture(texture);
        }
        if let Some(buffer) = self.vertex_buffer.take() {
            backend.delete_buffer(buffer);
        }
    }

    /// Whether [`Self::destroy`] has released the GPU resources
    pub fn is_destroyed(&self) -> bool {
        self.texture.is_none() && self.vertex_buffer.is_none()
    }

    /// Nominal line height in pixels
    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    /// Metrics of one glyph
    pub fn glyph(&self, code_point: CodePoint) -> &GlyphMetrics {
        &self.glyphs[code_point.index()]
    }

    /// Horizontal advance of one glyph
    pub fn advance(&self, code_point: CodePoint) -> u32 {
        self.glyphs[code_point.index()].advance_x
    }

    /// Baked quad of one glyph
    pub fn quad(&self, code_point: CodePoint) -> &GlyphQuad {
        &self.quads[code_point.index()]
    }

    /// Atlas dimensions in texels
    pub fn atlas_size(&self) -> (u32, u32) {
        self.atlas_size
    }

    /// Atlas texture, `None` once destroyed
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Glyph vertex buffer, `None` once destroyed
    pub fn vertex_buffer(&self) -> Option<BufferHandle> {
        self.vertex_buffer
    }
}

impl Drop for FontResource {
    fn drop(&mut self) {
        if !self.is_destroyed() {
            log::warn!("Font dropped without destroy(); texture {:?} leaked", self.texture);
        }
    }
}

/// Rasterize every code point, substituting placeholders for failures
pub fn rasterize_repertoire<R: GlyphRasterizer + ?Sized>(
    rasterizer: &R,
    pixel_height: f32,
) -> FontResult<[RasterizedGlyph; GLYPH_COUNT]> {
    let mut glyphs: [RasterizedGlyph; GLYPH_COUNT] = std::array::from_fn(|_| RasterizedGlyph::placeholder());
    let mut skipped = 0;

    for code_point in CodePoint::all() {
        match rasterizer.rasterize(code_point, pixel_height) {
            Ok(glyph) => glyphs[code_point.index()] = glyph,
            Err(FontError::GlyphRaster { reason, .. }) => {
                if char::from(code_point).is_ascii_control() {
                    log::trace!("Skipping glyph {}: {}", code_point.byte(), reason);
                } else {
                    log::warn!("Glyph {:?} unavailable: {}", char::from(code_point), reason);
                }
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    log::debug!("Rasterized {} glyphs ({} placeholders)", GLYPH_COUNT - skipped, skipped);
    Ok(glyphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::RecordingBackend;
    use crate::render::text::test_support::{FixedAdvanceRasterizer, DEJAVU_SANS, TEST_FONT_HEIGHT};
    use crate::render::{BackendError, TextureFilter, TextureWrap};

    fn cp(byte: u8) -> CodePoint {
        CodePoint::new(byte).unwrap()
    }

    #[test]
    fn test_build_uploads_texture_and_buffer() {
        let mut backend = RecordingBackend::new();
        let mut font =
            FontResource::build_with(&mut backend, &FixedAdvanceRasterizer::new(), TEST_FONT_HEIGHT, &BuildOptions::default())
                .unwrap();

        let texture = backend.texture(font.texture().unwrap()).unwrap();
        assert_eq!(texture.params.filter, TextureFilter::Nearest);
        assert_eq!(texture.params.wrap, TextureWrap::ClampToEdge);
        assert_eq!((texture.width, texture.height), font.atlas_size());

        let buffer = backend.buffer(font.vertex_buffer().unwrap()).unwrap();
        assert_eq!(buffer.len(), 2 * GLYPH_COUNT * 8 * 4);

        font.destroy(&mut backend);
    }

    #[test]
    fn test_advances_non_negative_and_blank_glyphs_inkless() {
        let mut backend = RecordingBackend::new();
        let rasterizer = FixedAdvanceRasterizer::new();
        let mut font =
            FontResource::build_with(&mut backend, &rasterizer, TEST_FONT_HEIGHT, &BuildOptions::default()).unwrap();

        let printable = CodePoint::all().filter(|c| !char::from(*c).is_ascii_control());
        for code_point in printable {
            assert!(font.advance(code_point) > 0, "{:?} does not advance", code_point);
            assert_eq!(font.glyph(code_point).advance_y, 0);
        }
        assert_eq!(font.advance(CodePoint::TAB), 0);

        for blank in [CodePoint::SPACE, CodePoint::TAB] {
            let v = font.quad(blank).vertices;
            assert_eq!(v[2] - v[0], 0.0, "{:?} has ink width", blank);
            assert_eq!(v[1] - v[5], 0.0, "{:?} has ink height", blank);
        }

        font.destroy(&mut backend);
    }

    #[test]
    fn test_line_height_scaled_and_floored() {
        let mut backend = RecordingBackend::new();
        let options = BuildOptions { ui_scale: 1.5, ..BuildOptions::default() };
        let mut font = FontResource::build_with(&mut backend, &FixedAdvanceRasterizer::new(), 13, &options).unwrap();

        assert_eq!(font.line_height(), 19);
        font.destroy(&mut backend);
    }

    #[test]
    fn test_zero_height_rejected() {
        let mut backend = RecordingBackend::new();
        let result = FontResource::build_with(&mut backend, &FixedAdvanceRasterizer::new(), 0, &BuildOptions::default());
        assert!(matches!(result, Err(FontError::FontLoad(_))));
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_invalid_bytes_allocate_nothing() {
        let mut backend = RecordingBackend::new();
        let result = FontResource::build(&mut backend, b"\0\0\0\0garbage", 14, &BuildOptions::default());

        assert!(matches!(result, Err(FontError::FontLoad(_))));
        assert_eq!(backend.live_textures(), 0);
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn test_overflow_allocates_nothing() {
        let mut backend = RecordingBackend::new();
        let options = BuildOptions { max_atlas_size: 8, ..BuildOptions::default() };
        let result = FontResource::build_with(&mut backend, &FixedAdvanceRasterizer::new(), TEST_FONT_HEIGHT, &options);

        assert!(matches!(result, Err(FontError::AtlasOverflow { limit: 8, .. })));
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_failed_buffer_upload_releases_texture() {
        let mut backend = RecordingBackend::new();
        backend.fail_buffer_uploads(true);
        let result =
            FontResource::build_with(&mut backend, &FixedAdvanceRasterizer::new(), TEST_FONT_HEIGHT, &BuildOptions::default());

        assert!(matches!(result, Err(FontError::Backend(BackendError::BufferCreation(_)))));
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_build_from_font_file_bytes() {
        let mut backend = RecordingBackend::new();
        let options = BuildOptions {
            require_pot: true,
            ..BuildOptions::default()
        };
        let mut font = FontResource::build(&mut backend, DEJAVU_SANS, 14, &options).unwrap();

        assert_eq!(font.line_height(), 14);
        let (width, height) = font.atlas_size();
        assert!(width.is_power_of_two() && height.is_power_of_two());

        // Quad bottoms: descender below the baseline, capital sitting on it
        let bottom = |byte| font.quad(cp(byte)).vertices[5];
        assert!(bottom(b'g') < 0.0);
        assert_eq!(bottom(b'T'), 0.0);

        let space = font.quad(cp(b' ')).vertices;
        assert_eq!(space[0], space[2]);
        assert_eq!(space[1], space[5]);
        assert!(font.advance(cp(b' ')) > 0);
        assert_eq!(font.advance(cp(b'\t')), 0);

        font.destroy(&mut backend);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut backend = RecordingBackend::new();
        let mut font =
            FontResource::build_with(&mut backend, &FixedAdvanceRasterizer::new(), TEST_FONT_HEIGHT, &BuildOptions::default())
                .unwrap();

        font.destroy(&mut backend);
        assert!(font.is_destroyed());
        assert_eq!(backend.live_textures(), 0);
        assert_eq!(backend.live_buffers(), 0);

        font.destroy(&mut backend);
        assert!(font.is_destroyed());
    }

    #[test]
    fn test_build_is_deterministic() {
        let rasterizer = FixedAdvanceRasterizer::new();
        let mut backend = RecordingBackend::new();
        let mut a = FontResource::build_with(&mut backend, &rasterizer, TEST_FONT_HEIGHT, &BuildOptions::default()).unwrap();
        let mut b = FontResource::build_with(&mut backend, &rasterizer, TEST_FONT_HEIGHT, &BuildOptions::default()).unwrap();

        let total = |f: &FontResource| CodePoint::all().map(|c| f.advance(c)).sum::<u32>();
        assert_eq!(total(&a), total(&b));
        assert_eq!(a.atlas_size(), b.atlas_size());
        assert!(CodePoint::all().all(|c| a.quad(c) == b.quad(c)));

        let ta = backend.texture(a.texture().unwrap()).unwrap().data.clone();
        let tb = backend.texture(b.texture().unwrap()).unwrap().data.clone();
        assert_eq!(ta, tb);

        a.destroy(&mut backend);
        b.destroy(&mut backend);
    }

    #[test]
    fn test_failed_glyphs_become_placeholders() {
        let mut backend = RecordingBackend::new();
        let rasterizer = FixedAdvanceRasterizer::new().refusing(b'~');
        let mut font =
            FontResource::build_with(&mut backend, &rasterizer, TEST_FONT_HEIGHT, &BuildOptions::default()).unwrap();

        assert_eq!(font.advance(cp(b'~')), 0);
        assert_eq!(font.quad(cp(b'~')).vertices, [0.0; 8]);
        assert!(font.advance(cp(b'}')) > 0);

        font.destroy(&mut backend);
    }
}
