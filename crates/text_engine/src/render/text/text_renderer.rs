//! Text renderer
//!
//! Draws glyph runs from a built [`FontResource`] as one batch per line:
//! `begin_batch` sets up the atlas and the pen origin, `emit` draws or
//! interprets one code point at a time, `end_batch` restores the backend.
//!
//! Coordinates are screen pixels with the origin at the bottom-left; the
//! modelview origin is the screen center, so every batch starts with a
//! translation of `(x - width / 2, y - height / 2)` rounded to whole pixels.

use super::atlas_packer::VERTEX_ARRAY_OFFSET;
use super::{CodePoint, FontResource, FontResult};
use crate::foundation::math::Vec2;
use crate::render::{Color, TextBackend};

/// Whether the next code point is a glyph or a color directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Code points draw glyphs
    #[default]
    Normal,
    /// An escape marker was seen; the next code point is a directive
    AwaitingDirective,
}

/// Per-batch renderer state threaded through [`TextRenderer::emit`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Glyph or directive mode
    pub mode: RenderMode,
    /// Color currently set on the backend
    pub color: Color,
    /// Color the batch started with, restored by the `0` directive
    pub base_color: Color,
    /// Pen offset from the batch origin
    pub pen: Vec2,
}

impl RenderState {
    /// Fresh state for a batch drawn in `color`
    pub fn new(color: Color) -> Self {
        Self {
            mode: RenderMode::Normal,
            color,
            base_color: color,
            pen: Vec2::zeros(),
        }
    }
}

/// Color selected by a directive byte, `None` for unknown directives
fn directive_color(directive: u8, base: Color) -> Option<Color> {
    match directive {
        b'r' => Some(Color::RED.with_alpha(base.a)),
        b'g' => Some(Color::GREEN.with_alpha(base.a)),
        b'b' => Some(Color::BLUE.with_alpha(base.a)),
        b'0' => Some(base),
        _ => None,
    }
}

/// Element indices of a glyph's two triangles in the glyph vertex buffer
fn glyph_indices(code_point: CodePoint) -> [u16; 6] {
    let base = 4 * code_point.byte() as u16;
    [base, base + 1, base + 3, base + 1, base + 3, base + 2]
}

/// Immediate-mode glyph batch renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRenderer {
    screen_width: f32,
    screen_height: f32,
}

impl TextRenderer {
    /// Create a renderer for a screen of the given size in pixels
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width: screen_width as f32,
            screen_height: screen_height as f32,
        }
    }

    /// Update the screen size used to place batches
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen_width = width as f32;
        self.screen_height = height as f32;
    }

    /// Screen size in pixels
    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_width, self.screen_height)
    }

    /// Start a batch with the pen at `(x, y)`
    ///
    /// `None` draws in white.
    pub fn begin_batch<B: TextBackend + ?Sized>(
        &self,
        backend: &mut B,
        font: &FontResource,
        x: f32,
        y: f32,
        color: Option<Color>,
    ) -> RenderState {
        if let Some(texture) = font.texture() {
            backend.bind_texture(texture);
        }
        if let Some(buffer) = font.vertex_buffer() {
            backend.bind_vertex_arrays(buffer, 0, VERTEX_ARRAY_OFFSET);
        }

        backend.push_matrix();
        backend.translate(
            (x - self.screen_width / 2.0).round(),
            (y - self.screen_height / 2.0).round(),
        );

        let color = color.unwrap_or(Color::WHITE);
        backend.set_color(color);
        RenderState::new(color)
    }

    /// Draw or interpret one code point
    pub fn emit<B: TextBackend + ?Sized>(
        &self,
        backend: &mut B,
        font: &FontResource,
        code_point: CodePoint,
        mut state: RenderState,
    ) -> RenderState {
        if state.mode == RenderMode::AwaitingDirective {
            state.mode = RenderMode::Normal;
            match directive_color(code_point.byte(), state.base_color) {
                Some(color) => {
                    backend.set_color(color);
                    state.color = color;
                }
                None => log::trace!("Ignoring text directive {:?}", char::from(code_point)),
            }
            return state;
        }

        match code_point {
            CodePoint::ESCAPE => state.mode = RenderMode::AwaitingDirective,
            CodePoint::TAB => {}
            _ => {
                backend.draw_triangles(&glyph_indices(code_point));

                let metrics = font.glyph(code_point);
                let advance = Vec2::new(metrics.advance_x as f32, metrics.advance_y as f32);
                backend.translate(advance.x, advance.y);
                state.pen += advance;
            }
        }
        state
    }

    /// Finish a batch, restoring the matrix and unbinding the atlas
    pub fn end_batch<B: TextBackend + ?Sized>(&self, backend: &mut B) {
        backend.unbind_vertex_arrays();
        backend.pop_matrix();
        backend.unbind_texture();
    }

    /// Draw `text` as one batch at `(x, y)`
    ///
    /// Returns the final state; its pen x equals the measured width.
    pub fn render_line<B: TextBackend + ?Sized>(
        &self,
        backend: &mut B,
        font: &FontResource,
        x: f32,
        y: f32,
        color: Option<Color>,
        text: &str,
    ) -> FontResult<RenderState> {
        let bytes = CodePoint::validate(text)?;
        Ok(self.render_bytes(backend, font, x, y, color, bytes))
    }

    /// [`Self::render_line`] over bytes already checked by [`CodePoint::validate`]
    pub(crate) fn render_bytes<B: TextBackend + ?Sized>(
        &self,
        backend: &mut B,
        font: &FontResource,
        x: f32,
        y: f32,
        color: Option<Color>,
        bytes: &[u8],
    ) -> RenderState {
        let mut state = self.begin_batch(backend, font, x, y, color);
        for &byte in bytes {
            state = self.emit(backend, font, CodePoint::from_validated(byte), state);
        }
        self.end_batch(backend);
        state
    }
}
