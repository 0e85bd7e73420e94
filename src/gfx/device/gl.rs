// src/gfx/device/gl.rs
//! OpenGL implementation of [`GraphicsDevice`] on top of `glow`.
//!
//! `glow` is taken from the ImGui renderer's re-export so both sides of the
//! frame share one `glow::Context` type.

use std::num::NonZeroU32;
use std::rc::Rc;

use imgui_glow_renderer::glow::{self, HasContext};

use super::{
    ActiveUniform, BufferTarget, BufferUsage, ElementType, GraphicsDevice, PixelFormat, Primitive,
    ShaderStage, UniformType,
};
use crate::error::{IrrecoverableError, Result};

/// Strings the driver reports about itself.
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub glsl_version: String,
    pub context_version: (i32, i32),
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== OpenGL Information ===")?;
        writeln!(f, "Vendor: {}", self.vendor)?;
        writeln!(f, "Renderer: {}", self.renderer)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "GLSL Version: {}", self.glsl_version)?;
        writeln!(
            f,
            "OpenGL Context Version: {}.{}",
            self.context_version.0, self.context_version.1
        )?;
        write!(f, "==========================")
    }
}

pub struct GlDevice {
    gl: Rc<glow::Context>,
}

impl GlDevice {
    /// Wrap a loaded context. The context must be current on this thread.
    pub fn new(gl: Rc<glow::Context>) -> Self {
        Self { gl }
    }

    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    /// Back-face culling and a standard depth buffer.
    pub fn apply_default_render_state(&self) {
        unsafe {
            self.gl.enable(glow::CULL_FACE);
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LESS);
            self.gl.depth_mask(true);
            self.gl.depth_range_f64(0.0, 1.0);
            self.gl.clear_depth_f64(1.0);
        }
    }

    pub fn describe(&self) -> DeviceInfo {
        unsafe {
            DeviceInfo {
                vendor: self.gl.get_parameter_string(glow::VENDOR),
                renderer: self.gl.get_parameter_string(glow::RENDERER),
                version: self.gl.get_parameter_string(glow::VERSION),
                glsl_version: self.gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
                context_version: (
                    self.gl.get_parameter_i32(glow::MAJOR_VERSION),
                    self.gl.get_parameter_i32(glow::MINOR_VERSION),
                ),
            }
        }
    }

    /// Log the pending GL error, if any. Returns `true` when there was none.
    pub fn check_error(&self, operation: &str) -> bool {
        let error = unsafe { self.gl.get_error() };
        if error == glow::NO_ERROR {
            log::debug!("{operation}: OK");
            return true;
        }

        let name = match error {
            glow::INVALID_ENUM => "GL_INVALID_ENUM",
            glow::INVALID_VALUE => "GL_INVALID_VALUE",
            glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
            glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            _ => "Unknown error code",
        };
        log::error!("OpenGL Error after {operation}: 0x{error:04X} ({name})");
        false
    }
}

fn allocation_error(kind: &'static str) -> impl FnOnce(String) -> IrrecoverableError {
    move |reason| IrrecoverableError::ResourceAllocation { kind, reason }
}

fn native_buffer(handle: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(handle).map(glow::NativeBuffer)
}

fn native_vertex_array(handle: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(handle).map(glow::NativeVertexArray)
}

fn native_shader(handle: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(handle).map(glow::NativeShader)
}

fn native_program(handle: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(handle).map(glow::NativeProgram)
}

fn native_texture(handle: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(handle).map(glow::NativeTexture)
}

fn native_location(location: i32) -> Option<glow::NativeUniformLocation> {
    u32::try_from(location).ok().map(glow::NativeUniformLocation)
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn primitive_mode(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Points => glow::POINTS,
        Primitive::Lines => glow::LINES,
        Primitive::LineStrip => glow::LINE_STRIP,
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

fn gl_size(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn gl_count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl GraphicsDevice for GlDevice {
    fn create_buffer(&self) -> Result<u32> {
        unsafe { self.gl.create_buffer() }
            .map(|buffer| buffer.0.get())
            .map_err(allocation_error("buffer"))
    }

    fn delete_buffer(&self, buffer: u32) {
        if let Some(buffer) = native_buffer(buffer) {
            unsafe { self.gl.delete_buffer(buffer) }
        }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        unsafe {
            self.gl.bind_buffer(buffer_target(target), native_buffer(buffer))
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl.buffer_data_u8_slice(buffer_target(target), data, buffer_usage(usage))
        }
    }

    fn create_vertex_array(&self) -> Result<u32> {
        unsafe { self.gl.create_vertex_array() }
            .map(|vertex_array| vertex_array.0.get())
            .map_err(allocation_error("vertex array"))
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        if let Some(vertex_array) = native_vertex_array(vertex_array) {
            unsafe { self.gl.delete_vertex_array(vertex_array) }
        }
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        unsafe {
            self.gl.bind_vertex_array(native_vertex_array(vertex_array))
        }
    }

    fn vertex_attrib_pointer(
        &self,
        location: u32,
        component_count: u32,
        element_type: ElementType,
        normalized: bool,
        stride: usize,
        offset: usize,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location,
                gl_count(component_count),
                element_type.to_gl(),
                normalized,
                gl_size(stride),
                gl_size(offset),
            )
        }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32> {
        unsafe { self.gl.create_shader(shader_type(stage)) }
            .map(|shader| shader.0.get())
            .map_err(allocation_error("shader"))
    }

    fn compile_shader(&self, shader: u32, source: &str) -> bool {
        let Some(shader) = native_shader(shader) else {
            return false;
        };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: u32) -> String {
        native_shader(shader)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.delete_shader(shader) }
        }
    }

    fn create_program(&self) -> Result<u32> {
        unsafe { self.gl.create_program() }
            .map(|program| program.0.get())
            .map_err(allocation_error("program"))
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn link_program(&self, program: u32) -> bool {
        let Some(program) = native_program(program) else {
            return false;
        };
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: u32) -> String {
        native_program(program)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.delete_program(program) }
        }
    }

    fn use_program(&self, program: u32) {
        unsafe { self.gl.use_program(native_program(program)) }
    }

    fn active_uniforms(&self, program: u32) -> Vec<ActiveUniform> {
        let Some(program) = native_program(program) else {
            return Vec::new();
        };
        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .filter(|uniform| !uniform.name.is_empty())
                .map(|uniform| ActiveUniform {
                    name: uniform.name,
                    ty: UniformType::from_gl(uniform.utype),
                })
                .collect()
        }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        let program = native_program(program)?;
        unsafe { self.gl.get_uniform_location(program, name) }
            .and_then(|location| i32::try_from(location.0).ok())
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        unsafe {
            self.gl.uniform_1_i32(native_location(location).as_ref(), value)
        }
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        unsafe {
            self.gl.uniform_1_f32(native_location(location).as_ref(), value)
        }
    }

    fn uniform_2f(&self, location: i32, x: f32, y: f32) {
        unsafe {
            self.gl.uniform_2_f32(native_location(location).as_ref(), x, y)
        }
    }

    fn uniform_3f(&self, location: i32, x: f32, y: f32, z: f32) {
        unsafe {
            self.gl.uniform_3_f32(native_location(location).as_ref(), x, y, z)
        }
    }

    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        unsafe {
            self.gl.uniform_4_f32(native_location(location).as_ref(), x, y, z, w)
        }
    }

    fn uniform_matrix4(&self, location: i32, columns: &[f32; 16]) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(
                native_location(location).as_ref(),
                false,
                columns,
            )
        }
    }

    fn create_texture(&self) -> Result<u32> {
        unsafe { self.gl.create_texture() }
            .map(|texture| texture.0.get())
            .map_err(allocation_error("texture"))
    }

    fn delete_texture(&self, texture: u32) {
        if let Some(texture) = native_texture(texture) {
            unsafe { self.gl.delete_texture(texture) }
        }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture_2d(&self, texture: u32) {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, native_texture(texture))
        }
    }

    fn upload_texture_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        // The driver reads width * height * channels bytes from `pixels`.
        if format.byte_len(width, height) != Some(pixels.len()) {
            log::error!(
                "Refusing texture upload: {width}x{height} {format:?} from {} bytes",
                pixels.len()
            );
            return;
        }
        let gl_format = match format {
            PixelFormat::Rgb8 => glow::RGB,
            PixelFormat::Rgba8 => glow::RGBA,
        };
        unsafe {
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::REPEAT as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::REPEAT as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            // RGB rows are not 4-byte aligned in general.
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_format as i32,
                gl_count(width),
                gl_count(height),
                0,
                gl_format,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
        }
    }

    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32) {
        unsafe {
            self.gl.draw_arrays(primitive_mode(primitive), gl_count(first), gl_count(count))
        }
    }

    fn draw_elements(&self, primitive: Primitive, count: u32) {
        unsafe {
            self.gl.draw_elements(
                primitive_mode(primitive),
                gl_count(count),
                glow::UNSIGNED_INT,
                0,
            )
        }
    }

    fn clear(&self, colour: [f32; 4]) {
        unsafe {
            self.gl.clear_color(colour[0], colour[1], colour[2], colour[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(x, y, gl_count(width), gl_count(height))
        }
    }
}
