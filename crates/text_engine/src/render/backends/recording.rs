//! Headless backend that records every command
//!
//! Used by tests and offline tools to observe exactly what the text system
//! asks of the GPU without a graphics context.

use std::collections::HashMap;

use crate::foundation::math::Vec2;
use crate::render::backend::{
    BackendError, BackendResult, BufferHandle, TextBackend, TextureHandle, TextureParams,
};
use crate::render::text::AtlasImage;
use crate::render::Color;

/// A single recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Texture bound for drawing
    BindTexture(TextureHandle),
    /// Texture unbound
    UnbindTexture,
    /// Vertex arrays bound
    BindVertexArrays {
        /// Source buffer
        buffer: BufferHandle,
        /// Byte offset of the texture coordinates
        uv_offset: usize,
        /// Byte offset of the vertex positions
        vertex_offset: usize,
    },
    /// Vertex arrays unbound
    UnbindVertexArrays,
    /// Matrix pushed
    PushMatrix,
    /// Matrix popped
    PopMatrix,
    /// Modelview translated
    Translate(f32, f32),
    /// Draw color changed
    SetColor(Color),
    /// Indexed triangles drawn, with the translation in effect at the time
    DrawTriangles {
        /// Element indices
        indices: Vec<u16>,
        /// Accumulated translation when the draw was issued
        origin: Vec2,
    },
}

/// Texture kept alive by the recording backend
#[derive(Debug, Clone)]
pub struct StoredTexture {
    /// Atlas width in pixels
    pub width: u32,
    /// Atlas height in pixels
    pub height: u32,
    /// Creation parameters
    pub params: TextureParams,
    /// Copy of the uploaded texels
    pub data: Vec<u8>,
}

/// Headless [`TextBackend`] that stores resources in memory and logs commands
#[derive(Debug, Default)]
pub struct RecordingBackend {
    textures: HashMap<TextureHandle, StoredTexture>,
    buffers: HashMap<BufferHandle, Vec<u8>>,
    commands: Vec<DrawCommand>,
    matrix_stack: Vec<Vec2>,
    translation: Vec2,
    next_id: u64,
    fail_texture_uploads: bool,
    fail_buffer_uploads: bool,
}

impl RecordingBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following texture upload fail
    pub fn fail_texture_uploads(&mut self, fail: bool) {
        self.fail_texture_uploads = fail;
    }

    /// Make every following buffer upload fail
    pub fn fail_buffer_uploads(&mut self, fail: bool) {
        self.fail_buffer_uploads = fail;
    }

    /// Commands recorded since creation or the last [`Self::clear_commands`]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands, keeping resources
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawTriangles { .. }))
            .count()
    }

    /// Look up a live texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&StoredTexture> {
        self.textures.get(&handle)
    }

    /// Look up a live buffer's contents
    pub fn buffer(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&handle).map(Vec::as_slice)
    }

    /// Number of textures not yet deleted
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Number of buffers not yet deleted
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Current accumulated translation
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Depth of the matrix stack
    pub fn matrix_depth(&self) -> usize {
        self.matrix_stack.len()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl TextBackend for RecordingBackend {
    fn create_texture(&mut self, image: &AtlasImage, params: TextureParams) -> BackendResult<TextureHandle> {
        if self.fail_texture_uploads {
            return Err(BackendError::TextureCreation("texture uploads disabled".to_string()));
        }

        let handle = TextureHandle(self.next_id());
        self.textures.insert(
            handle,
            StoredTexture {
                width: image.width,
                height: image.height,
                params,
                data: image.data.clone(),
            },
        );
        log::trace!("Recorded texture {:?} ({}x{})", handle, image.width, image.height);
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_none() {
            log::warn!("Deleting unknown texture {:?}", texture);
        }
    }

    fn create_static_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle> {
        if self.fail_buffer_uploads {
            return Err(BackendError::BufferCreation("buffer uploads disabled".to_string()));
        }

        let handle = BufferHandle(self.next_id());
        self.buffers.insert(handle, data.to_vec());
        Ok(handle)
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if self.buffers.remove(&buffer).is_none() {
            log::warn!("Deleting unknown buffer {:?}", buffer);
        }
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.commands.push(DrawCommand::BindTexture(texture));
    }

    fn unbind_texture(&mut self) {
        self.commands.push(DrawCommand::UnbindTexture);
    }

    fn bind_vertex_arrays(&mut self, buffer: BufferHandle, uv_offset: usize, vertex_offset: usize) {
        self.commands.push(DrawCommand::BindVertexArrays {
            buffer,
            uv_offset,
            vertex_offset,
        });
    }

    fn unbind_vertex_arrays(&mut self) {
        self.commands.push(DrawCommand::UnbindVertexArrays);
    }

    fn push_matrix(&mut self) {
        self.matrix_stack.push(self.translation);
        self.commands.push(DrawCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        match self.matrix_stack.pop() {
            Some(saved) => self.translation = saved,
            None => log::warn!("Matrix stack underflow"),
        }
        self.commands.push(DrawCommand::PopMatrix);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.translation += Vec2::new(dx, dy);
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn set_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetColor(color));
    }

    fn draw_triangles(&mut self, indices: &[u16]) {
        self.commands.push(DrawCommand::DrawTriangles {
            indices: indices.to_vec(),
            origin: self.translation,
        });
    }
}
