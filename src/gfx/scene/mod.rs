//! # Scene Module
//!
//! Things that get drawn and where they sit in the world.
//!
//! ## Key Components
//!
//! - [`LoadedObject`] - OBJ model split into per-material meshes, with the
//!   diffuse textures its materials reference
//! - [`WorldPose`] - position, rotation and scale producing a model matrix
//! - [`ObjVertex`] - interleaved vertex format used for loaded models
//!
//! ## Usage
//!
//! ```no_run
//! use sandbox3d::gfx::scene::LoadedObject;
//! # fn load(gfx: &sandbox3d::gfx::Gfx) -> sandbox3d::error::Result<()> {
//! let mut model = LoadedObject::load(gfx, "assets/models/shaderBall/shaderBall.obj")?;
//! model.pose.scale = cgmath::Vector3::new(0.01, 0.01, 0.01);
//! # Ok(())
//! # }
//! ```

pub mod loaded_object;
pub mod vertex;
pub mod world_pose;

// Re-export main types
pub use loaded_object::{dedup_vertices, LoadedObject, Shape};
pub use vertex::ObjVertex;
pub use world_pose::WorldPose;
