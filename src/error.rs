// src/error.rs
//! Error Types
//!
//! Setup-time failures that the caller cannot sensibly recover from: context
//! creation, shader compile/link failures, unreadable assets, invalid vertex
//! layouts and violations of the single-bound-program rule.
//!
//! Recoverable conditions (a missing uniform, a texture that fails to load for
//! one material) never surface here. They are logged and the operation
//! degrades instead.
//!
//! ```rust,ignore
//! use sandbox3d::error::{IrrecoverableError, Result};
//!
//! fn build_program(gfx: &Gfx) -> Result<ShaderProgram> {
//!     ShaderProgram::from_sources(gfx, VERT, None, FRAG)
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::device::ShaderStage;

/// Failure that propagates to the top-level entry point.
#[derive(Error, Debug)]
pub enum IrrecoverableError {
    // ========================================================================
    // Window & Context Errors
    // ========================================================================
    /// Window or GL context creation failed.
    #[error("Failed to create graphics context: {0}")]
    ContextCreation(String),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Presenting a frame failed.
    #[error("Surface error: {0}")]
    Surface(#[from] glutin::error::Error),

    /// The ImGui overlay failed to set up or draw a frame.
    #[error("ImGui error: {0}")]
    Ui(String),

    /// The driver refused to hand out a resource handle.
    #[error("Failed to allocate {kind}: {reason}")]
    ResourceAllocation {
        /// What was being allocated (buffer, texture, ...)
        kind: &'static str,
        /// Driver-provided reason
        reason: String,
    },

    // ========================================================================
    // Shader Errors
    // ========================================================================
    /// A shader stage failed to compile.
    #[error("{stage} shader compilation failed:\n{log}")]
    ShaderCompile {
        /// The stage that failed
        stage: ShaderStage,
        /// Driver info log
        log: String,
    },

    /// The program failed to link.
    #[error("Shader program linking failed:\n{log}")]
    ProgramLink {
        /// Driver info log
        log: String,
    },

    /// A shader file was readable but empty.
    #[error("Shader source is empty: {}", .path.display())]
    EmptyShaderSource {
        /// Path of the empty file
        path: PathBuf,
    },

    /// A second program was bound while a bind token was still alive.
    #[error(
        "Attempt to bind a shader whilst one is already bound. Are you sure you want to do this?"
    )]
    ProgramAlreadyBound,

    /// Strict uniform lookup found nothing.
    #[error("Uniform '{0}' does not exist in shader program")]
    UnknownUniform(String),

    // ========================================================================
    // Vertex Layout & Mesh Errors
    // ========================================================================
    /// The element type of a vertex attribute is not one we know the size of.
    #[error("Type not defined for vertex attribute: 0x{0:04X}")]
    UnknownAttributeType(u32),

    /// A mesh holds more vertices or indices than one draw call can address.
    #[error("Mesh has {0} elements, more than a draw call can address")]
    DrawCountOverflow(usize),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// A file could not be read.
    #[error("Could not open file {}: {source}", .path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The model file does not exist.
    #[error("Object file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The model file could not be parsed.
    #[error("Failed to load .obj file {}: {source}", .path.display())]
    ModelLoad {
        /// Path of the model
        path: PathBuf,
        /// Parser error
        #[source]
        source: tobj::LoadError,
    },

    /// Raw pixel data does not match the stated size and format.
    #[error("Pixel data for a {width}x{height} texture must be {expected} bytes, got {actual}")]
    InvalidPixelData {
        width: u32,
        height: u32,
        /// Bytes required by the size and format
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// An image could not be decoded.
    #[error("Failed to load texture {}: {source}", .path.display())]
    TextureDecode {
        /// Path of the image
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },
}

/// Alias for `std::result::Result<T, IrrecoverableError>`.
pub type Result<T> = std::result::Result<T, IrrecoverableError>;
