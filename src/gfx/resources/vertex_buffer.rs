// src/gfx/resources/vertex_buffer.rs
//! Owned vertex buffer object.

use bytemuck::Pod;

use crate::error::Result;
use crate::gfx::context::Gfx;
use crate::gfx::device::{BufferTarget, BufferUsage, NULL_HANDLE};

/// GPU buffer holding vertex attribute data.
///
/// Move-only: the buffer handle is released exactly once when the value is
/// dropped.
pub struct VertexBuffer {
    gfx: Gfx,
    id: u32,
    vertex_count: usize,
}

impl VertexBuffer {
    /// Allocates an empty buffer.
    pub fn new(gfx: &Gfx) -> Result<Self> {
        let id = gfx.device().create_buffer()?;
        Ok(Self {
            gfx: gfx.clone(),
            id,
            vertex_count: 0,
        })
    }

    /// Replaces the whole buffer with `bytes`, recording `vertex_count`
    /// vertices.
    ///
    /// The buffer is left bound to the array target.
    pub fn upload_bytes(&mut self, bytes: &[u8], vertex_count: usize, usage: BufferUsage) {
        let device = self.gfx.device();
        device.bind_buffer(BufferTarget::Array, self.id);
        device.buffer_data(BufferTarget::Array, bytes, usage);
        self.vertex_count = vertex_count;
    }

    /// Typed upload of a vertex slice.
    pub fn upload<V: Pod>(&mut self, vertices: &[V], usage: BufferUsage) {
        self.upload_bytes(bytemuck::cast_slice(vertices), vertices.len(), usage);
    }

    pub fn bind(&self) {
        self.gfx.device().bind_buffer(BufferTarget::Array, self.id);
    }

    pub fn unbind(&self) {
        self.gfx
            .device()
            .bind_buffer(BufferTarget::Array, NULL_HANDLE);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        if self.id != NULL_HANDLE {
            self.gfx.device().delete_buffer(self.id);
            self.id = NULL_HANDLE;
        }
    }
}
