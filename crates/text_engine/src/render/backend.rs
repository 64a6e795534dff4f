//! Backend abstraction traits for the rendering system
//!
//! This module defines the trait a rasterizer binding must implement for the
//! text system to upload its atlas and issue draws. The model is a classic
//! immediate-mode pipeline: one bound texture, one bound vertex buffer, a
//! modelview matrix stack and a current draw color.

use crate::render::text::AtlasImage;
use crate::render::Color;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors reported by a rendering backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Texture could not be created or uploaded
    #[error("Failed to create texture: {0}")]
    TextureCreation(String),

    /// Vertex buffer could not be created or uploaded
    #[error("Failed to create buffer: {0}")]
    BufferCreation(String),
}

/// Handle to a texture resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a static vertex buffer stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Texel layout of an uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Two bytes per texel: luminance then alpha
    LuminanceAlpha,
}

/// Sampling filter for both minification and magnification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest texel, no mipmaps
    Nearest,
    /// Bilinear
    Linear,
}

/// Addressing outside `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    /// Clamp to the edge texel
    ClampToEdge,
    /// Tile
    Repeat,
}

/// Parameters for texture creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// Texel layout
    pub format: TextureFormat,
    /// Sampling filter
    pub filter: TextureFilter,
    /// Addressing mode
    pub wrap: TextureWrap,
}

impl TextureParams {
    /// Settings for a glyph atlas
    ///
    /// Atlases are rasterized at their display size and must never be
    /// filtered across glyph borders.
    pub const fn glyph_atlas() -> Self {
        Self {
            format: TextureFormat::LuminanceAlpha,
            filter: TextureFilter::Nearest,
            wrap: TextureWrap::ClampToEdge,
        }
    }
}

/// Immediate-mode rasterizer binding used by the text system
///
/// Resource creation is fallible; state changes and draws are not, matching
/// how an immediate-mode API reports errors out of band.
pub trait TextBackend {
    /// Upload an atlas image and return a handle to the new texture
    fn create_texture(&mut self, image: &AtlasImage, params: TextureParams) -> BackendResult<TextureHandle>;

    /// Release a texture
    fn delete_texture(&mut self, texture: TextureHandle);

    /// Upload static vertex data and return a handle to the new buffer
    fn create_static_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle>;

    /// Release a vertex buffer
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Enable texturing and bind `texture`
    fn bind_texture(&mut self, texture: TextureHandle);

    /// Unbind the current texture and disable texturing
    fn unbind_texture(&mut self);

    /// Source texture coordinates and vertex positions from `buffer`
    ///
    /// Both arrays hold two `f32` per vertex; offsets are in bytes.
    fn bind_vertex_arrays(&mut self, buffer: BufferHandle, uv_offset: usize, vertex_offset: usize);

    /// Stop sourcing vertex arrays
    fn unbind_vertex_arrays(&mut self);

    /// Push the modelview matrix
    fn push_matrix(&mut self);

    /// Pop the modelview matrix
    fn pop_matrix(&mut self);

    /// Translate the current modelview matrix
    fn translate(&mut self, dx: f32, dy: f32);

    /// Set the current draw color
    fn set_color(&mut self, color: Color);

    /// Draw indexed triangles from the bound vertex arrays
    fn draw_triangles(&mut self, indices: &[u16]);
}
