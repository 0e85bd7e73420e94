// src/lib.rs
//! sandbox3d
//!
//! A small real-time OpenGL rendering sandbox built on glow, glutin and
//! winit, with owning wrappers for GPU resources, an asynchronous log sink
//! and a Dear ImGui control panel.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod logging;
pub mod performance;
pub mod prelude;
pub mod ui;

// Re-export main types for convenience
pub use app::{Demo, FrameInput, SandboxApp};
pub use config::{AppConfig, ViewerConfig};
pub use error::{IrrecoverableError, Result};
