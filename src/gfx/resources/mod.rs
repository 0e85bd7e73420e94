// src/gfx/resources/mod.rs
//! GPU resource wrappers
//!
//! Every wrapper owns exactly one driver handle (or, for [`Mesh`], a vertex
//! array plus its buffers) and releases it on drop. None of them are `Clone`;
//! moving one transfers ownership of the handle.

pub mod index_buffer;
pub mod mesh;
pub mod shader;
pub mod texture;
pub mod uniform;
pub mod vertex_buffer;
pub mod vertex_layout;

pub use index_buffer::IndexBuffer;
pub use mesh::Mesh;
pub use shader::{BoundProgram, ShaderProgram};
pub use texture::Texture;
pub use uniform::{UniformInfo, UniformValue};
pub use vertex_buffer::VertexBuffer;
pub use vertex_layout::{VertexAttribute, VertexLayout};
