//! # Procedural Geometry
//!
//! Shapes built in code rather than loaded from model files.
//!
//! ## Usage
//!
//! ```no_run
//! use sandbox3d::gfx::geometry::{rainbow_cube, ColorVertex};
//! use sandbox3d::gfx::resources::Mesh;
//! # fn build(gfx: &sandbox3d::gfx::Gfx) -> sandbox3d::error::Result<Mesh> {
//! let cube = Mesh::with_vertices(gfx, &rainbow_cube(), ColorVertex::layout())?;
//! # Ok(cube)
//! # }
//! ```

pub mod primitives;

pub use primitives::*;
