// src/gfx/resources/vertex_layout.rs
//! # Vertex Layout
//!
//! Describes how interleaved vertex data maps onto shader attribute
//! locations. Attributes are appended in order; each one starts where the
//! previous ended, and the stride is the total size.
//!
//! ```no_run
//! use sandbox3d::gfx::device::ElementType;
//! use sandbox3d::gfx::resources::VertexLayout;
//!
//! let mut layout = VertexLayout::new();
//! layout
//!     .add_attribute(0, 3, ElementType::Float) // position
//!     .add_attribute(1, 3, ElementType::Float) // normal
//!     .add_attribute(2, 2, ElementType::Float); // uv
//! assert_eq!(layout.stride(), 32);
//! ```

use crate::gfx::device::{ElementType, GraphicsDevice};

/// One attribute of an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub component_count: u32,
    pub element_type: ElementType,
    pub normalized: bool,
    /// Byte offset from the start of the vertex
    pub offset: usize,
    /// Total size in bytes
    pub size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute of `component_count` components.
    pub fn add_attribute(
        &mut self,
        location: u32,
        component_count: u32,
        element_type: ElementType,
    ) -> &mut Self {
        self.push(location, component_count, element_type, false)
    }

    /// Appends an attribute the driver maps into `[0, 1]` (or `[-1, 1]` for
    /// signed types).
    pub fn add_normalized_attribute(
        &mut self,
        location: u32,
        component_count: u32,
        element_type: ElementType,
    ) -> &mut Self {
        self.push(location, component_count, element_type, true)
    }

    fn push(
        &mut self,
        location: u32,
        component_count: u32,
        element_type: ElementType,
        normalized: bool,
    ) -> &mut Self {
        let size = component_count as usize * element_type.size();
        self.attributes.push(VertexAttribute {
            location,
            component_count,
            element_type,
            normalized,
            offset: self.stride,
            size,
        });
        self.stride += size;
        self
    }

    /// Points every attribute at the currently bound array buffer and enables
    /// it. A vertex array must be bound.
    pub fn apply(&self, device: &dyn GraphicsDevice) {
        for attribute in &self.attributes {
            device.vertex_attrib_pointer(
                attribute.location,
                attribute.component_count,
                attribute.element_type,
                attribute.normalized,
                self.stride,
                attribute.offset,
            );
            device.enable_vertex_attrib_array(attribute.location);
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }
}
