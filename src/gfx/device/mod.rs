//! # Graphics Device
//!
//! The seam between the resource wrappers and the OpenGL driver. Every call
//! the wrappers make goes through [`GraphicsDevice`], so the ownership and
//! binding rules can be exercised without a GPU.
//!
//! Handles are plain `u32` values issued by the driver, with
//! [`NULL_HANDLE`] meaning "no resource". Uniform locations are `i32` as in
//! GL. Implementations:
//!
//! - [`GlDevice`] - the real driver, on top of `glow`
//! - `RecordingDevice` - test double that records every call

pub mod gl;
#[cfg(test)]
pub(crate) mod recording;

use std::fmt;

use crate::error::{IrrecoverableError, Result};

pub use gl::GlDevice;

/// Sentinel for "no resource".
pub const NULL_HANDLE: u32 = 0;

/// Raw GL enum values the abstraction converts from and to.
pub mod consts {
    pub const UNSIGNED_BYTE: u32 = 0x1401;
    pub const INT: u32 = 0x1404;
    pub const UNSIGNED_INT: u32 = 0x1405;
    pub const FLOAT: u32 = 0x1406;
    pub const FLOAT_VEC2: u32 = 0x8B50;
    pub const FLOAT_VEC3: u32 = 0x8B51;
    pub const FLOAT_VEC4: u32 = 0x8B52;
    pub const FLOAT_MAT4: u32 = 0x8B5C;
    pub const SAMPLER_2D: u32 = 0x8B5E;
    pub const SAMPLER_CUBE: u32 = 0x8B60;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data
    Array,
    /// Index data, recorded in the bound vertex array
    ElementArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Geometry => "GEOMETRY",
            ShaderStage::Fragment => "FRAGMENT",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

/// Pixel layout of texture uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> u32 {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Bytes in a tightly packed `width` x `height` image, `None` on overflow.
    pub fn byte_len(self, width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.channels() as usize)
    }
}

/// Scalar type of a vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Float,
    UnsignedInt,
    Int,
    UnsignedByte,
}

impl ElementType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            ElementType::Float => std::mem::size_of::<f32>(),
            ElementType::UnsignedInt => std::mem::size_of::<u32>(),
            ElementType::Int => std::mem::size_of::<i32>(),
            ElementType::UnsignedByte => std::mem::size_of::<u8>(),
        }
    }

    pub fn to_gl(self) -> u32 {
        match self {
            ElementType::Float => consts::FLOAT,
            ElementType::UnsignedInt => consts::UNSIGNED_INT,
            ElementType::Int => consts::INT,
            ElementType::UnsignedByte => consts::UNSIGNED_BYTE,
        }
    }
}

impl TryFrom<u32> for ElementType {
    type Error = IrrecoverableError;

    fn try_from(gl_type: u32) -> Result<Self> {
        match gl_type {
            consts::FLOAT => Ok(ElementType::Float),
            consts::UNSIGNED_INT => Ok(ElementType::UnsignedInt),
            consts::INT => Ok(ElementType::Int),
            consts::UNSIGNED_BYTE => Ok(ElementType::UnsignedByte),
            other => Err(IrrecoverableError::UnknownAttributeType(other)),
        }
    }
}

/// Declared type of an active uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    Sampler2D,
    SamplerCube,
    /// Anything the setters do not cover, kept as the raw GL enum
    Other(u32),
}

impl UniformType {
    pub fn from_gl(gl_type: u32) -> Self {
        match gl_type {
            consts::INT => UniformType::Int,
            consts::FLOAT => UniformType::Float,
            consts::FLOAT_VEC2 => UniformType::Vec2,
            consts::FLOAT_VEC3 => UniformType::Vec3,
            consts::FLOAT_VEC4 => UniformType::Vec4,
            consts::FLOAT_MAT4 => UniformType::Mat4,
            consts::SAMPLER_2D => UniformType::Sampler2D,
            consts::SAMPLER_CUBE => UniformType::SamplerCube,
            other => UniformType::Other(other),
        }
    }

    /// GLSL spelling used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            UniformType::Int => "int",
            UniformType::Float => "float",
            UniformType::Vec2 => "vec2",
            UniformType::Vec3 => "vec3",
            UniformType::Vec4 => "vec4",
            UniformType::Mat4 => "mat4",
            UniformType::Sampler2D => "sampler2D",
            UniformType::SamplerCube => "samplerCube",
            UniformType::Other(_) => "unknown",
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a program's active-uniform list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveUniform {
    pub name: String,
    pub ty: UniformType,
}

/// Driver calls used by the resource layer.
///
/// All calls are synchronous and must be issued on the thread that owns the
/// graphics context. Delete calls with [`NULL_HANDLE`] are never made by the
/// wrappers.
pub trait GraphicsDevice {
    // Buffers
    fn create_buffer(&self) -> Result<u32>;
    fn delete_buffer(&self, buffer: u32);
    fn bind_buffer(&self, target: BufferTarget, buffer: u32);
    /// Replace the whole contents of the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    // Vertex arrays
    fn create_vertex_array(&self) -> Result<u32>;
    fn delete_vertex_array(&self, vertex_array: u32);
    fn bind_vertex_array(&self, vertex_array: u32);
    #[allow(clippy::too_many_arguments)]
    fn vertex_attrib_pointer(
        &self,
        location: u32,
        component_count: u32,
        element_type: ElementType,
        normalized: bool,
        stride: usize,
        offset: usize,
    );
    fn enable_vertex_attrib_array(&self, location: u32);

    // Shaders and programs
    fn create_shader(&self, stage: ShaderStage) -> Result<u32>;
    /// Upload source and compile. Returns the compile status.
    fn compile_shader(&self, shader: u32, source: &str) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);
    fn create_program(&self) -> Result<u32>;
    fn attach_shader(&self, program: u32, shader: u32);
    /// Link. Returns the link status.
    fn link_program(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn delete_program(&self, program: u32);
    fn use_program(&self, program: u32);
    fn active_uniforms(&self, program: u32) -> Vec<ActiveUniform>;
    fn uniform_location(&self, program: u32, name: &str) -> Option<i32>;

    // Uniform writes to the program in use
    fn uniform_1i(&self, location: i32, value: i32);
    fn uniform_1f(&self, location: i32, value: f32);
    fn uniform_2f(&self, location: i32, x: f32, y: f32);
    fn uniform_3f(&self, location: i32, x: f32, y: f32, z: f32);
    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32);
    /// Column-major 4x4 matrix.
    fn uniform_matrix4(&self, location: i32, columns: &[f32; 16]);

    // Textures
    fn create_texture(&self) -> Result<u32>;
    fn delete_texture(&self, texture: u32);
    fn active_texture_unit(&self, unit: u32);
    fn bind_texture_2d(&self, texture: u32);
    /// Upload tightly packed pixels to the bound 2D texture, set linear
    /// filtering with repeat wrapping and generate mipmaps. `pixels` must hold
    /// exactly [`PixelFormat::byte_len`] bytes.
    fn upload_texture_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]);

    // Drawing
    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32);
    /// Draw `count` `u32` indices from the bound element buffer.
    fn draw_elements(&self, primitive: Primitive, count: u32);
    fn clear(&self, colour: [f32; 4]);
    fn viewport(&self, x: i32, y: i32, width: u32, height: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_sizes() {
        assert_eq!(ElementType::Float.size(), 4);
        assert_eq!(ElementType::UnsignedInt.size(), 4);
        assert_eq!(ElementType::Int.size(), 4);
        assert_eq!(ElementType::UnsignedByte.size(), 1);
    }

    #[test]
    fn test_element_type_from_gl() {
        assert_eq!(ElementType::try_from(consts::FLOAT).unwrap(), ElementType::Float);
        assert_eq!(
            ElementType::try_from(consts::UNSIGNED_BYTE).unwrap(),
            ElementType::UnsignedByte
        );
        // GL_DOUBLE is not supported
        assert!(matches!(
            ElementType::try_from(0x140A),
            Err(IrrecoverableError::UnknownAttributeType(0x140A))
        ));
    }

    #[test]
    fn test_uniform_type_names() {
        assert_eq!(UniformType::from_gl(consts::FLOAT_MAT4).name(), "mat4");
        assert_eq!(UniformType::from_gl(consts::SAMPLER_2D).name(), "sampler2D");
        assert_eq!(UniformType::from_gl(0x8B53), UniformType::Other(0x8B53));
        assert_eq!(UniformType::Other(0x8B53).to_string(), "unknown");
    }
}
