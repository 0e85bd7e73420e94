// src/gfx/scene/vertex.rs
//! # Vertex Data Structures
//!
//! Vertex format shared by every mesh built from an OBJ file.

use crate::gfx::device::ElementType;
use crate::gfx::resources::VertexLayout;

/// A vertex of a loaded model.
///
/// `#[repr(C)]` with only `f32` fields, so the struct is tightly packed and
/// matches [`ObjVertex::layout`] byte for byte.
///
/// # Fields
///
/// - `position`: object space position [x, y, z]
/// - `normal`: normal vector [nx, ny, nz], zero when the file has none
/// - `tex_coord`: texture coordinates [u, v] with V flipped for GL
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl ObjVertex {
    /// Attribute layout for shaders:
    /// - location 0: position (3 floats)
    /// - location 1: normal (3 floats)
    /// - location 2: texture coordinates (2 floats)
    pub fn layout() -> VertexLayout {
        let mut layout = VertexLayout::new();
        layout
            .add_attribute(0, 3, ElementType::Float)
            .add_attribute(1, 3, ElementType::Float)
            .add_attribute(2, 2, ElementType::Float);
        layout
    }

    /// Key for exact equality over every component. `-0.0` is folded into
    /// `0.0` so the key agrees with float `==` on zeros.
    pub(crate) fn bit_key(&self) -> [u32; 8] {
        let mut key = [0u32; 8];
        let components = self
            .position
            .iter()
            .chain(&self.normal)
            .chain(&self.tex_coord);
        for (slot, value) in key.iter_mut().zip(components) {
            *slot = if *value == 0.0 { 0 } else { value.to_bits() };
        }
        key
    }
}
