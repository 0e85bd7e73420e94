// src/gfx/resources/index_buffer.rs
//! Owned element (index) buffer object.

use crate::error::Result;
use crate::gfx::context::Gfx;
use crate::gfx::device::{BufferTarget, BufferUsage, NULL_HANDLE};

/// GPU buffer of `u32` indices. Move-only like [`VertexBuffer`](super::VertexBuffer).
pub struct IndexBuffer {
    gfx: Gfx,
    id: u32,
    index_count: usize,
}

impl IndexBuffer {
    pub fn new(gfx: &Gfx) -> Result<Self> {
        let id = gfx.device().create_buffer()?;
        Ok(Self {
            gfx: gfx.clone(),
            id,
            index_count: 0,
        })
    }

    /// Replaces the whole buffer with `bytes`, recording `index_count`
    /// indices.
    ///
    /// The element binding is part of vertex array state, so call this with
    /// the owning vertex array bound.
    pub fn upload_bytes(&mut self, bytes: &[u8], index_count: usize, usage: BufferUsage) {
        let device = self.gfx.device();
        device.bind_buffer(BufferTarget::ElementArray, self.id);
        device.buffer_data(BufferTarget::ElementArray, bytes, usage);
        self.index_count = index_count;
    }

    pub fn upload(&mut self, indices: &[u32], usage: BufferUsage) {
        self.upload_bytes(bytemuck::cast_slice(indices), indices.len(), usage);
    }

    pub fn bind(&self) {
        self.gfx
            .device()
            .bind_buffer(BufferTarget::ElementArray, self.id);
    }

    pub fn unbind(&self) {
        self.gfx
            .device()
            .bind_buffer(BufferTarget::ElementArray, NULL_HANDLE);
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        if self.id != NULL_HANDLE {
            self.gfx.device().delete_buffer(self.id);
            self.id = NULL_HANDLE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::recording::{Call, Kind, TestRig};

    #[test]
    fn test_upload_indices() {
        let rig = TestRig::new();
        let mut indices = IndexBuffer::new(&rig.gfx).unwrap();
        indices.upload(&[0, 1, 2, 2, 3, 0], BufferUsage::StaticDraw);

        assert_eq!(indices.index_count(), 6);
        let calls = rig.device.calls();
        assert!(calls.contains(&Call::BindBuffer(BufferTarget::ElementArray, indices.id())));
        assert!(calls.contains(&Call::BufferData {
            target: BufferTarget::ElementArray,
            len: 24,
            usage: BufferUsage::StaticDraw,
        }));
    }

    #[test]
    fn test_drop_deletes_handle() {
        let rig = TestRig::new();
        let a = IndexBuffer::new(&rig.gfx).unwrap();
        let b = IndexBuffer::new(&rig.gfx).unwrap();
        let (a_id, b_id) = (a.id(), b.id());
        drop(b);
        drop(a);
        assert_eq!(rig.device.deletions(Kind::Buffer), vec![b_id, a_id]);
    }

    #[test]
    fn test_assignment_releases_overwritten_handle() {
        let rig = TestRig::new();
        let mut a = IndexBuffer::new(&rig.gfx).unwrap();
        let mut b = IndexBuffer::new(&rig.gfx).unwrap();
        b.upload(&[0, 1, 2], BufferUsage::StaticDraw);
        let (a_id, b_id) = (a.id(), b.id());

        a = b;
        assert_eq!(a.id(), b_id);
        assert_eq!(a.index_count(), 3);
        assert_eq!(rig.device.deletions(Kind::Buffer), vec![a_id]);

        drop(a);
        assert_eq!(rig.device.deletions(Kind::Buffer), vec![a_id, b_id]);
        assert_eq!(rig.device.live_count(Kind::Buffer), 0);
    }
}
