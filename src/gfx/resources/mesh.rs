// src/gfx/resources/mesh.rs
//! Vertex array plus the buffers it reads from.

use bytemuck::Pod;

use super::index_buffer::IndexBuffer;
use super::shader::BoundProgram;
use super::vertex_buffer::VertexBuffer;
use super::vertex_layout::VertexLayout;
use crate::error::{IrrecoverableError, Result};
use crate::gfx::context::Gfx;
use crate::gfx::device::{BufferUsage, Primitive, NULL_HANDLE};

/// Drawable geometry: one vertex array, one vertex buffer and an optional
/// index buffer.
///
/// Indexed meshes draw their index count, others their vertex count.
pub struct Mesh {
    gfx: Gfx,
    vao: u32,
    vertex_buffer: VertexBuffer,
    index_buffer: Option<IndexBuffer>,
    layout: VertexLayout,
    draw_count: u32,
}

impl Mesh {
    /// Empty mesh; draws nothing until vertex data is set.
    pub fn new(gfx: &Gfx) -> Result<Self> {
        let vertex_buffer = VertexBuffer::new(gfx)?;
        let vao = gfx.device().create_vertex_array()?;
        Ok(Self {
            gfx: gfx.clone(),
            vao,
            vertex_buffer,
            index_buffer: None,
            layout: VertexLayout::new(),
            draw_count: 0,
        })
    }

    /// Mesh drawn with `glDrawArrays` over `vertices`.
    ///
    /// # Arguments
    /// * `vertices` - Interleaved vertex data, uploaded once
    /// * `layout` - How the shader reads each vertex
    pub fn with_vertices<V: Pod>(gfx: &Gfx, vertices: &[V], layout: VertexLayout) -> Result<Self> {
        let mut mesh = Self::new(gfx)?;
        mesh.set_vertex_data(vertices, layout)?;
        Ok(mesh)
    }

    /// Mesh drawn with `glDrawElements` over `indices`.
    ///
    /// # Arguments
    /// * `vertices` - Interleaved vertex data
    /// * `layout` - How the shader reads each vertex
    /// * `indices` - Triangle indices into `vertices`
    pub fn with_indexed_vertices<V: Pod>(
        gfx: &Gfx,
        vertices: &[V],
        layout: VertexLayout,
        indices: &[u32],
    ) -> Result<Self> {
        let mut mesh = Self::with_vertices(gfx, vertices, layout)?;
        mesh.set_index_data(indices)?;
        Ok(mesh)
    }

    /// Uploads `vertices` and applies `layout` to the vertex array.
    ///
    /// Fails with [`IrrecoverableError::DrawCountOverflow`] before touching
    /// the device when a non-indexed mesh has more than `u32::MAX` vertices.
    pub fn set_vertex_data<V: Pod>(&mut self, vertices: &[V], layout: VertexLayout) -> Result<()> {
        let vertex_count = if self.index_buffer.is_none() {
            Some(draw_count(vertices.len())?)
        } else {
            None
        };

        let device = self.gfx.device();
        device.bind_vertex_array(self.vao);
        self.vertex_buffer.upload(vertices, BufferUsage::StaticDraw);
        layout.apply(device);
        device.bind_vertex_array(NULL_HANDLE);
        self.vertex_buffer.unbind();

        self.layout = layout;
        if let Some(count) = vertex_count {
            self.draw_count = count;
        }
        Ok(())
    }

    /// Uploads `indices`, creating the index buffer on first use. From then on
    /// the mesh draws indexed.
    pub fn set_index_data(&mut self, indices: &[u32]) -> Result<()> {
        let index_count = draw_count(indices.len())?;
        if self.index_buffer.is_none() {
            self.index_buffer = Some(IndexBuffer::new(&self.gfx)?);
        }

        let device = self.gfx.device();
        device.bind_vertex_array(self.vao);
        if let Some(index_buffer) = self.index_buffer.as_mut() {
            index_buffer.upload(indices, BufferUsage::StaticDraw);
        }
        device.bind_vertex_array(NULL_HANDLE);

        self.draw_count = index_count;
        Ok(())
    }

    /// Draws with the program held by `_program`.
    pub fn draw(&self, _program: &BoundProgram<'_>, primitive: Primitive) {
        if self.draw_count == 0 {
            return;
        }
        let device = self.gfx.device();
        device.bind_vertex_array(self.vao);
        if self.index_buffer.is_some() {
            device.draw_elements(primitive, self.draw_count);
        } else {
            device.draw_arrays(primitive, 0, self.draw_count);
        }
        device.bind_vertex_array(NULL_HANDLE);
    }

    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }
}

fn draw_count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| IrrecoverableError::DrawCountOverflow(len))
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if self.vao != NULL_HANDLE {
            self.gfx.device().delete_vertex_array(self.vao);
            self.vao = NULL_HANDLE;
        }
    }
}
