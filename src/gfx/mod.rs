//! # Graphics Module
//!
//! Everything that talks to the GPU, layered bottom-up:
//!
//! - **Device** ([`device`]) - the [`GraphicsDevice`](device::GraphicsDevice)
//!   seam and its OpenGL implementation
//! - **Context** ([`context`]) - per-context state shared by all resources
//! - **Resources** ([`resources`]) - owning wrappers for buffers, vertex
//!   arrays, textures and shader programs
//! - **Camera** ([`camera`]) - perspective camera and arcball controller
//! - **Scene** ([`scene`]) - OBJ models and world poses
//! - **Geometry** ([`geometry`]) - procedural shapes
//!
//! ## Ownership
//!
//! Every resource holds a [`Gfx`] and releases its handle on drop, so the
//! context outlives everything created from it. All of it is `!Send`: GL
//! calls stay on the thread that owns the context.

pub mod camera;
pub mod context;
pub mod device;
pub mod geometry;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{ArcballController, Camera};
pub use context::{Gfx, GfxContext};
pub use device::{GlDevice, GraphicsDevice};
