//! # Text Engine
//!
//! Bitmap-atlas text for the game UI: glyph rasterization, atlas packing,
//! text layout and immediate-mode text rendering.
//!
//! ## Features
//!
//! - **Glyph Atlas**: The 128 low-range code points rasterized with `fontdue`
//!   and packed into a single luminance+alpha texture
//! - **Layout**: Truncation, centering, word wrap and block height queries
//!   that never touch the GPU
//! - **Rendering**: Begin/emit/end batches over any [`render::TextBackend`],
//!   with inline color escape directives
//! - **Font Registry**: Default and small fonts owned by a [`TextContext`]
//!   instead of process-wide globals
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TextConfig::default();
//!     let font_bytes = std::fs::read("dat/font.ttf")?;
//!
//!     let mut backend = RecordingBackend::new();
//!     let fonts = FontRegistry::load(&mut backend, &font_bytes, &config)?;
//!     let mut text = TextContext::new(backend, fonts, &config);
//!
//!     text.print(None, 10.0, 10.0, None, "Hull integrity nominal")?;
//!     let status = format!("Credits: {}", 1200);
//!     text.print_mid(Some(FontId::Small), 200, 10.0, 40.0, Some(Color::GREEN), &status)?;
//!
//!     text.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

pub use config::{Config, ConfigError, TextConfig};
pub use render::text::{FontError, FontRegistry, FontResource, FontResult, TextContext};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, TextConfig},
        foundation::math::{Vec2, Vec4},
        render::{
            backends::RecordingBackend,
            text::{
                BuildOptions, CodePoint, FontError, FontId, FontRegistry, FontResource,
                FontResult, TextContext,
            },
            Color, TextBackend,
        },
    };
}
