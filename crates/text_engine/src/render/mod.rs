//! # Rendering System
//!
//! The text side of the UI renderer. It sits on top of a single
//! immediate-mode rasterizer binding described by [`TextBackend`].
//!
//! ## Architecture
//!
//! - **Backend**: The seam to the graphics API (texture/buffer upload, matrix
//!   stack, color, indexed triangle draws)
//! - **Backends**: Concrete implementations; [`backends::RecordingBackend`]
//!   is headless and records every command
//! - **Text**: Atlas building, layout and rendering of UI text

pub mod backend;
pub mod backends;
pub mod color;
pub mod text;

pub use backend::{
    BackendError, BackendResult, BufferHandle, TextBackend, TextureFilter, TextureFormat,
    TextureHandle, TextureParams, TextureWrap,
};
pub use color::Color;
