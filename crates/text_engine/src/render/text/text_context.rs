//! Text context
//!
//! The print and measure surface used by game UI code. A [`TextContext`]
//! owns the backend, the default and small fonts, and the renderer, so no
//! font state lives in globals.

use super::text_layout::{block_height_bytes, break_bytes, fit_bytes, measure_bytes, LINE_SPACING};
use super::{CodePoint, FontResource, FontResult, FontdueRasterizer, GlyphRasterizer, TextRenderer};
use crate::config::TextConfig;
use crate::render::{Color, TextBackend};

/// Which registered font to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontId {
    /// The default UI font
    #[default]
    Default,
    /// The small UI font
    Small,
}

/// The two fonts every UI screen can draw with
#[derive(Debug)]
pub struct FontRegistry {
    default: FontResource,
    small: FontResource,
}

impl FontRegistry {
    /// Register already built fonts
    pub fn new(default: FontResource, small: FontResource) -> Self {
        Self { default, small }
    }

    /// Build both fonts from one font file at the configured heights
    pub fn load<B: TextBackend + ?Sized>(backend: &mut B, font_data: &[u8], config: &TextConfig) -> FontResult<Self> {
        let rasterizer = FontdueRasterizer::from_bytes(font_data)?;
        Self::load_with(backend, &rasterizer, config)
    }

    /// Build both fonts from any glyph source
    ///
    /// If the small font fails the default font is released before the
    /// error is returned.
    pub fn load_with<B, R>(backend: &mut B, rasterizer: &R, config: &TextConfig) -> FontResult<Self>
    where
        B: TextBackend + ?Sized,
        R: GlyphRasterizer + ?Sized,
    {
        let options = config.build_options();
        let mut default = FontResource::build_with(backend, rasterizer, config.default_font_height, &options)?;

        let small = match FontResource::build_with(backend, rasterizer, config.small_font_height, &options) {
            Ok(font) => font,
            Err(e) => {
                log::error!("Small font failed to build: {}", e);
                default.destroy(backend);
                return Err(e);
            }
        };

        Ok(Self { default, small })
    }

    /// Look up a font, `None` meaning the default font
    pub fn get(&self, id: Option<FontId>) -> &FontResource {
        match id.unwrap_or_default() {
            FontId::Default => &self.default,
            FontId::Small => &self.small,
        }
    }

    /// Release both fonts; a second call is a no-op
    pub fn destroy<B: TextBackend + ?Sized>(&mut self, backend: &mut B) {
        self.default.destroy(backend);
        self.small.destroy(backend);
    }

    /// Whether both fonts have been released
    pub fn is_destroyed(&self) -> bool {
        self.default.is_destroyed() && self.small.is_destroyed()
    }

    fn live(&self, id: Option<FontId>) -> Option<&FontResource> {
        let font = self.get(id);
        if font.is_destroyed() {
            log::warn!("Drawing with {:?} font after shutdown", id.unwrap_or_default());
            return None;
        }
        Some(font)
    }
}

/// Check `text` before drawing it, logging refusals
/// Validate caller text, logging anything the fonts cannot show
fn checked(text: &str) -> FontResult<&[u8]> {
    CodePoint::validate(text).map_err(|e| {
        log::warn!("Rejecting text {:?}: {}", text, e);
        e
    })
}

/// Owner of the backend and fonts, exposing the print and measure calls
///
/// Positions are screen pixels with the origin at the bottom-left. Every
/// `font` argument takes `None` for the default font and every `color`
/// argument takes `None` for white.
#[derive(Debug)]
pub struct TextContext<B: TextBackend> {
    backend: B,
    fonts: FontRegistry,
    renderer: TextRenderer,
}

impl<B: TextBackend> TextContext<B> {
    /// Create a context drawing to a screen sized as in `config`
    pub fn new(backend: B, fonts: FontRegistry, config: &TextConfig) -> Self {
        Self {
            backend,
            fonts,
            renderer: TextRenderer::new(config.screen_width, config.screen_height),
        }
    }

    /// Font used for `id`
    pub fn font(&self, id: Option<FontId>) -> &FontResource {
        self.fonts.get(id)
    }

    /// Both registered fonts
    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// The backend being drawn to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Follow a screen resize
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.renderer.set_screen_size(width, height);
    }

    /// Draw `text` verbatim with the pen starting at `(x, y)`
    pub fn print(&mut self, font: Option<FontId>, x: f32, y: f32, color: Option<Color>, text: &str) -> FontResult<()> {
        let bytes = checked(text)?;
        let Some(resource) = self.fonts.live(font) else {
            return Ok(());
        };

        self.renderer.render_bytes(&mut self.backend, resource, x, y, color, bytes);
        Ok(())
    }

    /// Draw the prefix of `text` that fits in `max` pixels
    ///
    /// Returns the number of bytes left undrawn.
    pub fn print_max(
        &mut self,
        font: Option<FontId>,
        max: u32,
        x: f32,
        y: f32,
        color: Option<Color>,
        text: &str,
    ) -> FontResult<usize> {
        let bytes = checked(text)?;
        let Some(resource) = self.fonts.live(font) else {
            return Ok(bytes.len());
        };

        let (count, _) = fit_bytes(resource, bytes, max);
        self.renderer.render_bytes(&mut self.backend, resource, x, y, color, &bytes[..count]);
        Ok(bytes.len() - count)
    }

    /// Draw the prefix of `text` that fits in `width`, centered in a box of
    /// that width starting at `x`
    ///
    /// Returns the number of bytes left undrawn.
    pub fn print_mid(
        &mut self,
        font: Option<FontId>,
        width: u32,
        x: f32,
        y: f32,
        color: Option<Color>,
        text: &str,
    ) -> FontResult<usize> {
        let bytes = checked(text)?;
        let Some(resource) = self.fonts.live(font) else {
            return Ok(bytes.len());
        };

        let (count, fitted) = fit_bytes(resource, bytes, width);
        let offset = (width as f32 - fitted as f32) / 2.0;
        self.renderer
            .render_bytes(&mut self.backend, resource, x + offset, y, color, &bytes[..count]);
        Ok(bytes.len() - count)
    }

    /// Draw `text` word-wrapped into the box at `(x, y)` of `width` by `height`
    ///
    /// The first baseline sits one line height below the top of the box and
    /// each following line `1.5` line heights lower. Lines whose baseline
    /// would fall below the bottom of the box are not drawn.
    pub fn print_block(
        &mut self,
        font: Option<FontId>,
        width: u32,
        height: u32,
        x: f32,
        y: f32,
        color: Option<Color>,
        text: &str,
    ) -> FontResult<()> {
        let bytes = checked(text)?;
        let Some(resource) = self.fonts.live(font) else {
            return Ok(());
        };

        let line_height = resource.line_height() as f32;
        let mut pen_y = y + height as f32 - line_height;
        let mut pos = 0;

        while pen_y - y > -1e-5 {
            let line = break_bytes(resource, &bytes[pos..], width);
            self.renderer
                .render_bytes(&mut self.backend, resource, x, pen_y, color, &bytes[pos..pos + line.end]);

            match line.next {
                Some(next) => pos += next,
                None => break,
            }
            pen_y -= LINE_SPACING as f32 * line_height;
        }

        if pos < bytes.len() && pen_y - y <= -1e-5 {
            log::debug!("Text block clipped with {} bytes undrawn", bytes.len() - pos);
        }
        Ok(())
    }

    /// Width of `text` on one line
    pub fn measure_width(&self, font: Option<FontId>, text: &str) -> FontResult<u32> {
        let bytes = checked(text)?;
        Ok(measure_bytes(self.fonts.get(font), bytes))
    }

    /// Height of `text` wrapped to `width`
    pub fn measure_height(&self, font: Option<FontId>, width: u32, text: &str) -> FontResult<u32> {
        let bytes = checked(text)?;
        Ok(block_height_bytes(self.fonts.get(font), bytes, width))
    }

    /// Release both fonts; further prints draw nothing
    pub fn shutdown(&mut self) {
        if !self.fonts.is_destroyed() {
            log::info!("Releasing UI fonts");
        }
        self.fonts.destroy(&mut self.backend);
    }

    /// Release the fonts and hand back the backend
    pub fn into_backend(mut self) -> B {
        self.shutdown();
        self.backend
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::{DrawCommand, RecordingBackend};
    use crate::render::text::test_support::{FixedAdvanceRasterizer, DEJAVU_SANS, LETTER_ADVANCE};
    use crate::render::text::FontError;

    fn config() -> TextConfig {
        TextConfig::default().with_font_heights(12, 10)
    }

    fn context() -> TextContext<RecordingBackend> {
        let mut backend = RecordingBackend::new();
        let fonts = FontRegistry::load_with(&mut backend, &FixedAdvanceRasterizer::new(), &config()).unwrap();
        TextContext::new(backend, fonts, &config())
    }

    /// Translation applied right after each matrix push, one per batch
    fn batch_origins(backend: &RecordingBackend) -> Vec<(f32, f32)> {
        backend
            .commands()
            .windows(2)
            .filter_map(|w| match w {
                [DrawCommand::PushMatrix, DrawCommand::Translate(x, y)] => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_print_draws_every_glyph() {
        let mut text = context();
        text.print(None, 10.0, 20.0, None, "Hull 100").unwrap();

        assert_eq!(text.backend().draw_count(), 8);
        assert_eq!(batch_origins(text.backend()), vec![(-390.0, -280.0)]);
        assert_eq!(text.backend().matrix_depth(), 0);

        text.shutdown();
    }

    #[test]
    fn test_font_selection() {
        let mut text = context();
        assert_eq!(text.font(None).line_height(), 12);
        assert_eq!(text.font(Some(FontId::Small)).line_height(), 10);

        let small = text.font(Some(FontId::Small)).texture().unwrap();
        text.print(Some(FontId::Small), 0.0, 0.0, None, "x").unwrap();
        assert_eq!(text.backend().commands()[0], DrawCommand::BindTexture(small));

        text.shutdown();
    }

    #[test]
    fn test_print_max_reports_suppressed_bytes() {
        let mut text = context();
        let suppressed = text.print_max(None, 45, 0.0, 0.0, None, "hello world").unwrap();

        assert_eq!(suppressed, 7);
        assert_eq!(text.backend().draw_count(), 4);

        text.backend_mut().clear_commands();
        assert_eq!(text.print_max(None, 1000, 0.0, 0.0, None, "hello").unwrap(), 0);
        assert_eq!(text.backend().draw_count(), 5);

        text.shutdown();
    }

    #[test]
    fn test_print_mid_centers_in_box() {
        let mut text = context();
        let truncated = text.print_mid(None, 60, 400.0, 300.0, None, "ab").unwrap();

        assert_eq!(truncated, 0);
        assert_eq!(batch_origins(text.backend()), vec![(20.0, 0.0)]);

        text.backend_mut().clear_commands();
        let truncated = text.print_mid(None, 54, 400.0, 300.0, None, "hello world").unwrap();
        assert_eq!(truncated, 6);
        assert_eq!(text.backend().draw_count(), 5);
        assert_eq!(batch_origins(text.backend()), vec![(2.0, 0.0)]);

        text.shutdown();
    }

    #[test]
    fn test_print_block_wraps_downward() {
        let mut text = context();
        text.print_block(None, 40, 100, 400.0, 300.0, None, "abc def").unwrap();

        // Baselines at 300 + 100 - 12 and 18 pixels below
        assert_eq!(batch_origins(text.backend()), vec![(0.0, 88.0), (0.0, 70.0)]);
        assert_eq!(text.backend().draw_count(), 6);

        text.shutdown();
    }

    #[test]
    fn test_print_block_clips_to_height() {
        let mut text = context();
        text.print_block(None, 1000, 20, 400.0, 300.0, None, "a\nb\nc").unwrap();
        assert_eq!(batch_origins(text.backend()).len(), 1);

        text.backend_mut().clear_commands();
        text.print_block(None, 1000, 30, 400.0, 300.0, None, "a\nb\nc").unwrap();
        assert_eq!(batch_origins(text.backend()), vec![(0.0, 18.0), (0.0, 0.0)]);
        assert_eq!(text.backend().draw_count(), 2);

        text.shutdown();
    }

    #[test]
    fn test_print_block_hard_breaks_without_losing_glyphs() {
        let mut text = context();
        text.print_block(None, 25, 200, 0.0, 0.0, None, "abcdef").unwrap();

        assert_eq!(batch_origins(text.backend()).len(), 3);
        assert_eq!(text.backend().draw_count(), 6);

        text.shutdown();
    }

    #[test]
    fn test_print_block_newline_after_hard_break() {
        let mut text = context();
        text.print_block(None, 5, 200, 0.0, 0.0, None, "ab\ncd").unwrap();

        let origins = batch_origins(text.backend());
        assert_eq!(origins.len(), 4);
        assert_eq!(text.backend().draw_count(), 4);
        // Consecutive baselines, no blank line between "b" and "c"
        assert_eq!(origins[2].1 - origins[1].1, -18.0);

        text.shutdown();
    }

    #[test]
    fn test_load_builds_both_fonts_from_file_bytes() {
        let mut backend = RecordingBackend::new();
        let config = TextConfig::default();
        let fonts = FontRegistry::load(&mut backend, DEJAVU_SANS, &config).unwrap();
        assert_eq!(backend.live_textures(), 2);
        assert_eq!(backend.live_buffers(), 2);

        let mut text = TextContext::new(backend, fonts, &config);
        assert_eq!(text.fonts().get(None).line_height(), 14);
        assert_eq!(text.fonts().get(Some(FontId::Small)).line_height(), 10);

        let wide = text.measure_width(None, "Jump").unwrap();
        let narrow = text.measure_width(Some(FontId::Small), "Jump").unwrap();
        assert!(wide > narrow && narrow > 0);

        text.print(None, 0.0, 0.0, None, "Jump").unwrap();
        assert_eq!(text.backend().draw_count(), 4);

        text.shutdown();
        assert_eq!(text.backend().live_textures(), 0);
    }

    #[test]
    fn test_colors_reset_per_block_line() {
        let mut text = context();
        text.print_block(None, 1000, 100, 0.0, 0.0, Some(Color::WHITE), "\x1brred\nplain").unwrap();

        let colors: Vec<Color> = text
            .backend()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetColor(color) => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::WHITE, Color::RED, Color::WHITE]);

        text.shutdown();
    }

    #[test]
    fn test_measures() {
        let text = context();
        assert_eq!(text.measure_width(None, "hello world").unwrap(), 10 * LETTER_ADVANCE + 5);
        assert_eq!(text.measure_width(Some(FontId::Small), "").unwrap(), 0);
        assert_eq!(text.measure_height(None, 40, "abc def").unwrap(), 30);
        assert_eq!(text.measure_height(Some(FontId::Small), 100, "abc").unwrap(), 10);
        assert_eq!(text.measure_height(None, 100, "").unwrap(), 0);

        text.into_backend();
    }

    #[test]
    fn test_bad_encoding_draws_nothing() {
        let mut text = context();

        let result = text.print(None, 0.0, 0.0, None, "Sol \u{2192} Alpha");
        assert!(matches!(result, Err(FontError::Encoding { index: 4, .. })));
        assert!(text.print_block(None, 100, 100, 0.0, 0.0, None, "\u{e9}").is_err());
        assert!(text.backend().commands().is_empty());

        assert!(matches!(
            text.measure_width(None, "Sol \u{2192}"),
            Err(FontError::Encoding { index: 4, .. })
        ));
        assert!(matches!(
            text.measure_height(Some(FontId::Small), 100, "caf\u{e9}"),
            Err(FontError::Encoding { index: 3, .. })
        ));

        text.shutdown();
    }

    #[test]
    fn test_shutdown_releases_and_is_idempotent() {
        let mut text = context();
        assert_eq!(text.backend().live_textures(), 2);

        text.shutdown();
        text.shutdown();
        assert_eq!(text.backend().live_textures(), 0);
        assert_eq!(text.backend().live_buffers(), 0);

        assert_eq!(text.print_max(None, 100, 0.0, 0.0, None, "late").unwrap(), 4);
        assert!(text.backend().commands().is_empty());

        let backend = text.into_backend();
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_failed_small_font_releases_default() {
        let mut backend = RecordingBackend::new();
        let config = config().with_font_heights(12, 0);
        let result = FontRegistry::load_with(&mut backend, &FixedAdvanceRasterizer::new(), &config);

        assert!(matches!(result, Err(FontError::FontLoad(_))));
        assert_eq!(backend.live_textures(), 0);
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut backend = RecordingBackend::new();
        let result = FontRegistry::load(&mut backend, b"not a font", &config());
        assert!(matches!(result, Err(FontError::FontLoad(_))));
    }

    #[test]
    fn test_screen_resize_moves_origin() {
        let mut text = context();
        text.set_screen_size(1280, 720);
        text.print(None, 640.0, 360.0, None, "a").unwrap();
        assert_eq!(batch_origins(text.backend()), vec![(0.0, 0.0)]);

        text.shutdown();
    }
}
