// src/gfx/device/recording.rs
//! Test double for [`GraphicsDevice`].
//!
//! Issues handles from a counter, records every call, and "compiles" GLSL by
//! scanning `uniform <type> <name>;` declarations. A source containing
//! `#error` fails to compile; one containing `// link-fail` fails to link.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{
    ActiveUniform, BufferTarget, BufferUsage, ElementType, GraphicsDevice, PixelFormat, Primitive,
    ShaderStage, UniformType,
};
use crate::error::Result;
use crate::gfx::context::{Gfx, GfxContext};
use crate::logging::capture::CaptureBuffer;
use crate::logging::LogSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Buffer,
    VertexArray,
    Shader,
    Program,
    Texture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformWrite {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(Kind, u32),
    Delete(Kind, u32),
    BindBuffer(BufferTarget, u32),
    BufferData {
        target: BufferTarget,
        len: usize,
        usage: BufferUsage,
    },
    BindVertexArray(u32),
    VertexAttribPointer {
        location: u32,
        component_count: u32,
        element_type: ElementType,
        normalized: bool,
        stride: usize,
        offset: usize,
    },
    EnableVertexAttribArray(u32),
    CompileShader(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(u32),
    Uniform(i32, UniformWrite),
    ActiveTexture(u32),
    BindTexture(u32),
    UploadTexture {
        width: u32,
        height: u32,
        format: PixelFormat,
        len: usize,
    },
    DrawArrays(Primitive, u32, u32),
    DrawElements(Primitive, u32),
    Clear([f32; 4]),
    Viewport(i32, i32, u32, u32),
}

#[derive(Default)]
struct State {
    next_handle: u32,
    live: HashMap<u32, Kind>,
    calls: Vec<Call>,
    shader_sources: HashMap<u32, String>,
    attached: HashMap<u32, Vec<u32>>,
    program_uniforms: HashMap<u32, Vec<(String, UniformType, Option<i32>)>>,
    hidden_locations: HashSet<String>,
    fail_allocation: bool,
}

#[derive(Default)]
pub struct RecordingDevice {
    state: RefCell<State>,
}

impl RecordingDevice {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Handles deleted so far, in order.
    pub fn deletions(&self, kind: Kind) -> Vec<u32> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Delete(k, handle) if *k == kind => Some(*handle),
                _ => None,
            })
            .collect()
    }

    pub fn live_count(&self, kind: Kind) -> usize {
        self.state
            .borrow()
            .live
            .values()
            .filter(|k| **k == kind)
            .count()
    }

    pub fn uniform_writes(&self) -> Vec<(i32, UniformWrite)> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Uniform(location, write) => Some((*location, write.clone())),
                _ => None,
            })
            .collect()
    }

    /// Report `name` as active but without a location.
    pub fn hide_location(&self, name: &str) {
        self.state
            .borrow_mut()
            .hidden_locations
            .insert(name.to_owned());
    }

    /// Make every subsequent create call fail.
    pub fn fail_allocations(&self) {
        self.state.borrow_mut().fail_allocation = true;
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn create(&self, kind: Kind) -> Result<u32> {
        let mut state = self.state.borrow_mut();
        if state.fail_allocation {
            return Err(crate::error::IrrecoverableError::ResourceAllocation {
                kind: "recorded resource",
                reason: "allocation disabled".into(),
            });
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.live.insert(handle, kind);
        state.calls.push(Call::Create(kind, handle));
        Ok(handle)
    }

    fn delete(&self, kind: Kind, handle: u32) {
        let mut state = self.state.borrow_mut();
        let removed = state.live.remove(&handle);
        assert_eq!(
            removed,
            Some(kind),
            "deleted {kind:?} {handle} which is not live (double free?)"
        );
        state.calls.push(Call::Delete(kind, handle));
    }
}

fn parse_uniform_type(token: &str) -> UniformType {
    match token {
        "int" => UniformType::Int,
        "float" => UniformType::Float,
        "vec2" => UniformType::Vec2,
        "vec3" => UniformType::Vec3,
        "vec4" => UniformType::Vec4,
        "mat4" => UniformType::Mat4,
        "sampler2D" => UniformType::Sampler2D,
        "samplerCube" => UniformType::SamplerCube,
        _ => UniformType::Other(0),
    }
}

fn declared_uniforms(source: &str) -> Vec<(String, UniformType)> {
    source
        .lines()
        .filter_map(|line| {
            let mut tokens = line.trim().strip_prefix("uniform ")?.split_whitespace();
            let ty = parse_uniform_type(tokens.next()?);
            let name = tokens.next()?.trim_end_matches(';');
            Some((name.to_owned(), ty))
        })
        .collect()
}

impl GraphicsDevice for RecordingDevice {
    fn create_buffer(&self) -> Result<u32> {
        self.create(Kind::Buffer)
    }

    fn delete_buffer(&self, buffer: u32) {
        self.delete(Kind::Buffer, buffer);
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.record(Call::BufferData {
            target,
            len: data.len(),
            usage,
        });
    }

    fn create_vertex_array(&self) -> Result<u32> {
        self.create(Kind::VertexArray)
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.delete(Kind::VertexArray, vertex_array);
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        self.record(Call::BindVertexArray(vertex_array));
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
        self.record(Call::VertexAttribPointer {
            location,
            component_count,
            element_type,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::EnableVertexAttribArray(location));
    }

    fn create_shader(&self, _stage: ShaderStage) -> Result<u32> {
        self.create(Kind::Shader)
    }

    fn compile_shader(&self, shader: u32, source: &str) -> bool {
        self.record(Call::CompileShader(shader));
        self.state
            .borrow_mut()
            .shader_sources
            .insert(shader, source.to_owned());
        !source.contains("#error")
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "ERROR: 0:1: '#error' : user error".into()
    }

    fn delete_shader(&self, shader: u32) {
        self.delete(Kind::Shader, shader);
    }

    fn create_program(&self) -> Result<u32> {
        self.create(Kind::Program)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
        self.state
            .borrow_mut()
            .attached
            .entry(program)
            .or_default()
            .push(shader);
    }

    fn link_program(&self, program: u32) -> bool {
        self.record(Call::LinkProgram(program));
        let mut state = self.state.borrow_mut();
        let sources: Vec<String> = state
            .attached
            .get(&program)
            .into_iter()
            .flatten()
            .filter_map(|shader| state.shader_sources.get(shader).cloned())
            .collect();
        if sources.iter().any(|source| source.contains("// link-fail")) {
            return false;
        }

        let mut uniforms: Vec<(String, UniformType, Option<i32>)> = Vec::new();
        let mut next_location = 0;
        for (name, ty) in sources.iter().flat_map(|source| declared_uniforms(source)) {
            if uniforms.iter().any(|(existing, _, _)| *existing == name) {
                continue;
            }
            let location = if state.hidden_locations.contains(&name) {
                None
            } else {
                next_location += 1;
                Some(next_location - 1)
            };
            uniforms.push((name, ty, location));
        }
        state.program_uniforms.insert(program, uniforms);
        true
    }

    fn program_info_log(&self, _program: u32) -> String {
        "ERROR: Linking failed: unresolved symbol".into()
    }

    fn delete_program(&self, program: u32) {
        self.delete(Kind::Program, program);
    }

    fn use_program(&self, program: u32) {
        self.record(Call::UseProgram(program));
    }

    fn active_uniforms(&self, program: u32) -> Vec<ActiveUniform> {
        self.state
            .borrow()
            .program_uniforms
            .get(&program)
            .into_iter()
            .flatten()
            .map(|(name, ty, _)| ActiveUniform {
                name: name.clone(),
                ty: *ty,
            })
            .collect()
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        self.state
            .borrow()
            .program_uniforms
            .get(&program)?
            .iter()
            .find(|(existing, _, _)| existing == name)
            .and_then(|(_, _, location)| *location)
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        self.record(Call::Uniform(location, UniformWrite::Int(value)));
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        self.record(Call::Uniform(location, UniformWrite::Float(value)));
    }

    fn uniform_2f(&self, location: i32, x: f32, y: f32) {
        self.record(Call::Uniform(location, UniformWrite::Vec2([x, y])));
    }

    fn uniform_3f(&self, location: i32, x: f32, y: f32, z: f32) {
        self.record(Call::Uniform(location, UniformWrite::Vec3([x, y, z])));
    }

    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        self.record(Call::Uniform(location, UniformWrite::Vec4([x, y, z, w])));
    }

    fn uniform_matrix4(&self, location: i32, columns: &[f32; 16]) {
        self.record(Call::Uniform(location, UniformWrite::Mat4(*columns)));
    }

    fn create_texture(&self) -> Result<u32> {
        self.create(Kind::Texture)
    }

    fn delete_texture(&self, texture: u32) {
        self.delete(Kind::Texture, texture);
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture_2d(&self, texture: u32) {
        self.record(Call::BindTexture(texture));
    }

    fn upload_texture_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        self.record(Call::UploadTexture {
            width,
            height,
            format,
            len: pixels.len(),
        });
    }

    fn draw_arrays(&self, primitive: Primitive, first: u32, count: u32) {
        self.record(Call::DrawArrays(primitive, first, count));
    }

    fn draw_elements(&self, primitive: Primitive, count: u32) {
        self.record(Call::DrawElements(primitive, count));
    }

    fn clear(&self, colour: [f32; 4]) {
        self.record(Call::Clear(colour));
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        self.record(Call::Viewport(x, y, width, height));
    }
}

/// Everything a resource test needs: the device, a context over it, and the
/// log sink with its captured output.
pub struct TestRig {
    pub device: Rc<RecordingDevice>,
    pub gfx: Gfx,
    pub sink: LogSink,
    pub output: CaptureBuffer,
}

impl TestRig {
    pub fn new() -> Self {
        let device = RecordingDevice::new();
        let output = CaptureBuffer::default();
        let sink = LogSink::with_writer(Box::new(output.clone()));
        let gfx = GfxContext::new(device.clone(), sink.handle());
        Self {
            device,
            gfx,
            sink,
            output,
        }
    }

    /// Flush the sink and return everything it wrote.
    pub fn finish(self) -> Vec<String> {
        let Self { sink, output, .. } = self;
        sink.shutdown();
        output.lines()
    }
}
