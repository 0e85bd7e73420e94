// src/config.rs
//! # Configuration
//!
//! Plain structs with defaults and `with_*` builders. Nothing is read from
//! disk; binaries build what they need in code and take at most a model path
//! on the command line.

use std::path::PathBuf;

use cgmath::{Point3, Vector3};

/// Window, context and UI settings for [`SandboxApp`](crate::app::SandboxApp).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    /// Initial logical window size
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Requested OpenGL core profile version `(major, minor)`
    pub gl_version: (u8, u8),
    pub clear_colour: [f32; 4],
    pub font_size: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "sandbox3d".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            gl_version: (3, 3),
            clear_colour: [0.2, 0.3, 0.3, 1.0],
            font_size: 16.0,
        }
    }
}

impl AppConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_gl_version(mut self, major: u8, minor: u8) -> Self {
        self.gl_version = (major, minor);
        self
    }

    pub fn with_clear_colour(mut self, colour: [f32; 4]) -> Self {
        self.clear_colour = colour;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }
}

/// Assets and placement for the model viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub model_path: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    /// Uniform scale applied to the model
    pub model_scale: f32,
    pub camera_position: Point3<f32>,
    /// Added to the model position to get the orbit target
    pub orbit_offset: Vector3<f32>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("assets/models/shaderBall/shaderBall.obj"),
            vertex_shader: PathBuf::from("shaders/simpleDiffuseTexturedPhong/vert.glsl"),
            fragment_shader: PathBuf::from("shaders/simpleDiffuseTexturedPhong/frag.glsl"),
            model_scale: 0.01,
            camera_position: Point3::new(0.0, 2.5, 3.0),
            orbit_offset: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

impl ViewerConfig {
    /// Defaults, with the model path taken from the first CLI argument when
    /// one is given.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = args.nth(1) {
            config.model_path = PathBuf::from(path);
        }
        config
    }

    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }
}
