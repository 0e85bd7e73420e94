// src/gfx/geometry/primitives.rs
//! # Primitive Shape Generation
//!
//! Unit shapes centred at the origin, wound counter-clockwise when seen from
//! outside so back-face culling keeps the outer faces.

use crate::gfx::device::ElementType;
use crate::gfx::resources::VertexLayout;

/// Position plus RGB colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub colour: [f32; 3],
}

impl ColorVertex {
    /// Location 0: position, location 1: colour. Both 3 floats.
    pub fn layout() -> VertexLayout {
        let mut layout = VertexLayout::new();
        layout
            .add_attribute(0, 3, ElementType::Float)
            .add_attribute(1, 3, ElementType::Float);
        layout
    }
}

/// Corners of each face, counter-clockwise from outside.
#[rustfmt::skip]
const CUBE_FACES: [[[f32; 3]; 4]; 6] = [
    // Front (+Z)
    [[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]],
    // Back (-Z)
    [[-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5]],
    // Left (-X)
    [[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]],
    // Right (+X)
    [[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]],
    // Top (+Y)
    [[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]],
    // Bottom (-Y)
    [[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]],
];

/// One colour per face, in `CUBE_FACES` order.
const RAINBOW: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [1.0, 0.5, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.5, 0.0, 1.0],
];

/// Unit cube as 36 unindexed vertices (two triangles per face), each face a
/// different colour.
pub fn rainbow_cube() -> Vec<ColorVertex> {
    CUBE_FACES
        .iter()
        .zip(RAINBOW)
        .flat_map(|(corners, colour)| {
            [0, 1, 2, 2, 3, 0].map(|i| ColorVertex {
                position: corners[i],
                colour,
            })
        })
        .collect()
}
