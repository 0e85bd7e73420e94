pub mod arcball;
pub mod camera;

// Re-export main types
pub use arcball::{ArcballBounds, ArcballController};
pub use camera::Camera;
