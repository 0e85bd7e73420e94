// src/prelude.rs
//! # Prelude
//!
//! Commonly used types for writing a [`Demo`].
//!
//! ```no_run
//! use sandbox3d::prelude::*;
//!
//! struct Blank;
//!
//! impl Demo for Blank {
//!     fn title(&self) -> &str {
//!         "blank"
//!     }
//!
//!     fn init(&mut self, _gfx: &Gfx, _size: (u32, u32)) -> sandbox3d::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _dt: f32, _input: &FrameInput) {}
//!
//!     fn render(&mut self, _gfx: &Gfx) -> sandbox3d::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let sink = LogSink::new();
//! SandboxApp::new(AppConfig::new("blank"), Blank, sink.handle()).run()?;
//! # Ok::<(), sandbox3d::IrrecoverableError>(())
//! ```

// Re-export core application types
pub use crate::app::{Demo, FrameInput, SandboxApp};
pub use crate::config::{AppConfig, ViewerConfig};
pub use crate::error::{IrrecoverableError, Result};
pub use crate::logging::{LogHandle, LogSink};

// Re-export graphics and scene types
pub use crate::gfx::camera::{ArcballController, Camera};
pub use crate::gfx::device::Primitive;
pub use crate::gfx::geometry::{rainbow_cube, ColorVertex};
pub use crate::gfx::resources::{BoundProgram, Mesh, ShaderProgram, Texture, VertexLayout};
pub use crate::gfx::scene::{LoadedObject, WorldPose};
pub use crate::gfx::{Gfx, GfxContext};

// Re-export UI and timing
pub use crate::performance::{FrameCounter, FrameHistory};
pub use crate::ui::{draw_controls, perf_monitor, UiState};

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Matrix4, Point3, Quaternion, Rad, Rotation3, Vector2, Vector3};
pub use imgui::Ui;
