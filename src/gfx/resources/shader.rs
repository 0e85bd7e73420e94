// src/gfx/resources/shader.rs
//! # Shader Programs
//!
//! [`ShaderProgram`] owns a linked program and the uniforms discovered when it
//! was linked. Uniforms can only be written through a [`BoundProgram`], the
//! token returned by [`ShaderProgram::bind`].
//!
//! ## Binding Rule
//!
//! At most one token exists per graphics context. Binding while another token
//! is alive fails with [`IrrecoverableError::ProgramAlreadyBound`]. Dropping
//! the token unbinds the program, including when it goes out of scope through
//! `?` or a panic.
//!
//! ```no_run
//! # use sandbox3d::gfx::{Gfx, resources::ShaderProgram};
//! # fn frame(gfx: &Gfx, program: &ShaderProgram) -> sandbox3d::error::Result<()> {
//! let mut bound = program.bind()?;
//! bound.set_uniform("time", 1.5f32);
//! // `bound` dropped here: program unbound
//! # Ok(())
//! # }
//! ```
//!
//! ## Diagnostics
//!
//! Writing a uniform the program does not have, or with a value of the wrong
//! type, is not an error. The write is skipped and a warning is logged the
//! first time each name goes wrong for a given program.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::uniform::{UniformInfo, UniformValue};
use crate::error::{IrrecoverableError, Result};
use crate::gfx::context::Gfx;
use crate::gfx::device::{GraphicsDevice, ShaderStage, UniformType, NULL_HANDLE};

/// Compiled stage objects, deleted when the build finishes either way.
struct StageObjects<'a> {
    gfx: &'a Gfx,
    shaders: Vec<u32>,
}

impl StageObjects<'_> {
    fn compile(&mut self, stage: ShaderStage, source: &str) -> Result<u32> {
        let device = self.gfx.device();
        let shader = device.create_shader(stage)?;
        self.shaders.push(shader);

        if !device.compile_shader(shader, source) {
            return Err(IrrecoverableError::ShaderCompile {
                stage,
                log: device.shader_info_log(shader),
            });
        }
        Ok(shader)
    }
}

impl Drop for StageObjects<'_> {
    fn drop(&mut self) {
        for shader in self.shaders.drain(..) {
            self.gfx.device().delete_shader(shader);
        }
    }
}

/// A linked GLSL program.
pub struct ShaderProgram {
    gfx: Gfx,
    id: u32,
    uniforms: HashMap<String, UniformInfo>,
    warned: RefCell<HashSet<String>>,
}

impl ShaderProgram {
    /// Compiles, links and introspects a program from source strings.
    ///
    /// # Arguments
    /// * `vertex` - Vertex stage source
    /// * `geometry` - Optional geometry stage source
    /// * `fragment` - Fragment stage source
    ///
    /// # Errors
    /// [`IrrecoverableError::ShaderCompile`] naming the failing stage,
    /// [`IrrecoverableError::ProgramLink`] with the driver log, or an
    /// allocation failure. Nothing created along the way outlives the error.
    pub fn from_sources(
        gfx: &Gfx,
        vertex: &str,
        geometry: Option<&str>,
        fragment: &str,
    ) -> Result<Self> {
        let device = gfx.device();
        let mut stages = StageObjects {
            gfx,
            shaders: Vec::with_capacity(3),
        };

        stages.compile(ShaderStage::Vertex, vertex)?;
        if let Some(geometry) = geometry {
            stages.compile(ShaderStage::Geometry, geometry)?;
        }
        stages.compile(ShaderStage::Fragment, fragment)?;

        let mut program = Self {
            gfx: gfx.clone(),
            id: device.create_program()?,
            uniforms: HashMap::new(),
            warned: RefCell::new(HashSet::new()),
        };

        for &shader in &stages.shaders {
            device.attach_shader(program.id, shader);
        }
        if !device.link_program(program.id) {
            return Err(IrrecoverableError::ProgramLink {
                log: device.program_info_log(program.id),
            });
        }

        program.uniforms = discover_uniforms(device, program.id);
        log::debug!(
            "Linked program {} with {} uniforms",
            program.id,
            program.uniforms.len()
        );
        Ok(program)
    }

    /// Reads the stage sources from disk and builds them with
    /// [`from_sources`](Self::from_sources).
    ///
    /// # Arguments
    /// * `vertex_path` - Vertex stage file
    /// * `geometry_path` - Optional geometry stage file
    /// * `fragment_path` - Fragment stage file
    ///
    /// # Errors
    /// [`IrrecoverableError::Io`] for an unreadable file and
    /// [`IrrecoverableError::EmptyShaderSource`] for a blank one, before any
    /// GL object is created.
    pub fn from_files(
        gfx: &Gfx,
        vertex_path: impl AsRef<Path>,
        geometry_path: Option<&Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let vertex = read_source(vertex_path.as_ref())?;
        let geometry = geometry_path.map(read_source).transpose()?;
        let fragment = read_source(fragment_path.as_ref())?;

        Self::from_sources(gfx, &vertex, geometry.as_deref(), &fragment)
    }

    /// Makes this the program in use and returns the token for it.
    pub fn bind(&self) -> Result<BoundProgram<'_>> {
        if self.gfx.is_program_bound() {
            return Err(IrrecoverableError::ProgramAlreadyBound);
        }
        self.gfx.device().use_program(self.id);
        self.gfx.set_program_bound(true);
        Ok(BoundProgram { program: self })
    }

    pub fn uniforms(&self) -> &HashMap<String, UniformInfo> {
        &self.uniforms
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Logs `message` the first time `name` misbehaves on this program.
    fn warn_once(&self, name: &str, message: impl FnOnce() -> String) {
        if self.warned.borrow_mut().insert(name.to_owned()) {
            self.gfx.log().log(message());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.id != NULL_HANDLE {
            self.gfx.device().delete_program(self.id);
            self.id = NULL_HANDLE;
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|source| IrrecoverableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if source.trim().is_empty() {
        return Err(IrrecoverableError::EmptyShaderSource {
            path: PathBuf::from(path),
        });
    }
    Ok(source)
}

fn discover_uniforms(device: &dyn GraphicsDevice, program: u32) -> HashMap<String, UniformInfo> {
    let mut uniforms = HashMap::new();
    for active in device.active_uniforms(program) {
        // Keyed by the reported name; arrays keep their `[0]` suffix.
        let name = active.name;
        match device.uniform_location(program, &name) {
            Some(location) => {
                uniforms.insert(
                    name.clone(),
                    UniformInfo {
                        name,
                        location,
                        ty: active.ty,
                    },
                );
            }
            None => log::debug!("Uniform '{name}' has no location, skipped"),
        }
    }
    uniforms
}

/// Proof that a program is the one in use on its context.
///
/// Neither `Clone` nor `Copy`; dropping it unbinds the program.
pub struct BoundProgram<'a> {
    program: &'a ShaderProgram,
}

impl<'a> BoundProgram<'a> {
    pub fn program(&self) -> &'a ShaderProgram {
        self.program
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.program.uniforms.contains_key(name)
    }

    /// Strict lookup.
    pub fn uniform_info(&self, name: &str) -> Result<&'a UniformInfo> {
        self.program
            .uniforms
            .get(name)
            .ok_or_else(|| IrrecoverableError::UnknownUniform(name.to_owned()))
    }

    /// Writes `value` if the program declares `name` with a matching type.
    pub fn set_uniform<T: UniformValue>(&mut self, name: &str, value: T) {
        self.write_checked(name, T::TYPE, |device, location| {
            value.write(device, location)
        });
    }

    pub fn set_uniform_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    /// Points a `sampler2D` uniform at texture unit `unit`.
    pub fn set_uniform_sampler2d(&mut self, name: &str, unit: i32) {
        self.write_checked(name, UniformType::Sampler2D, |device, location| {
            device.uniform_1i(location, unit)
        });
    }

    fn write_checked(
        &mut self,
        name: &str,
        provided: UniformType,
        write: impl FnOnce(&dyn GraphicsDevice, i32),
    ) {
        let program = self.program;
        let Some(info) = program.uniforms.get(name) else {
            program.warn_once(name, || {
                format!("WARNING: Uniform '{name}' does not exist in shader program")
            });
            return;
        };

        if info.ty != provided {
            program.warn_once(name, || {
                format!(
                    "WARNING: Uniform '{name}' type mismatch. Expected {}, got {provided}",
                    info.ty
                )
            });
            return;
        }

        write(program.gfx.device(), info.location);
    }
}

impl Drop for BoundProgram<'_> {
    fn drop(&mut self) {
        self.program.gfx.device().use_program(NULL_HANDLE);
        self.program.gfx.set_program_bound(false);
    }
}
