//! Text rendering system
//!
//! Builds a glyph atlas from a vector font once per (font, height) pair, then
//! lays out and draws UI text against it every frame.
//!
//! # Architecture
//!
//! - [`GlyphRasterizer`]: Rasterizes the 128 low-range code points (`fontdue`)
//! - [`atlas_packer`]: Packs glyph bitmaps into one luminance+alpha image
//! - [`FontResource`]: Uploaded atlas, advances and baked glyph quads
//! - [`text_layout`]: Pure width/wrap/height queries
//! - [`TextRenderer`]: Begin/emit/end batch state machine
//! - [`TextContext`]: Font registry plus the print and measure surface
//!
//! # Example
//!
//! ```no_run
//! use text_engine::render::backends::RecordingBackend;
//! use text_engine::render::text::{text_layout, BuildOptions, FontResource};
//!
//! let font_bytes = std::fs::read("dat/font.ttf")?;
//! let mut backend = RecordingBackend::new();
//! let mut font = FontResource::build(&mut backend, &font_bytes, 14, &BuildOptions::default())?;
//!
//! let width = text_layout::measure_width(&font, "Docking clearance granted")?;
//! let (_, fitted) = text_layout::fit_width(&font, "Docking clearance granted", 80)?;
//! assert!(fitted <= width.min(80));
//!
//! font.destroy(&mut backend);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod atlas_packer;
mod code_point;
mod error;
mod font_resource;
mod rasterizer;
mod text_context;
pub mod text_layout;
mod text_renderer;

#[cfg(test)]
pub(crate) mod test_support;

pub use atlas_packer::{AtlasImage, GlyphPlacement, GlyphQuad, PackOptions, PackedAtlas, MAX_ATLAS_DIMENSION};
pub use code_point::{CodePoint, ESCAPE, GLYPH_COUNT};
pub use error::{FontError, FontResult};
pub use font_resource::{rasterize_repertoire, BuildOptions, FontResource, GlyphMetrics};
pub use rasterizer::{FontdueRasterizer, GlyphRasterizer, RasterizedGlyph};
pub use text_context::{FontId, FontRegistry, TextContext};
pub use text_layout::LineBreak;
pub use text_renderer::{RenderMode, RenderState, TextRenderer};
