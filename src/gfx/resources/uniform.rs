// src/gfx/resources/uniform.rs
//! Uniform metadata and the values that can be written to uniforms.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use crate::gfx::device::{GraphicsDevice, UniformType};

/// Active uniform discovered after linking.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformInfo {
    pub name: String,
    pub location: i32,
    pub ty: UniformType,
}

/// A Rust value with a fixed GLSL uniform type.
pub trait UniformValue {
    /// Declared type the value must match before it is written.
    const TYPE: UniformType;

    /// Write to `location` of the program in use.
    fn write(&self, device: &dyn GraphicsDevice, location: i32);
}

impl UniformValue for f32 {
    const TYPE: UniformType = UniformType::Float;

    fn write(&self, device: &dyn GraphicsDevice, location: i32) {
        device.uniform_1f(location, *self);
    }
}

impl UniformValue for i32 {
    const TYPE: UniformType = UniformType::Int;

    fn write(&self, device: &dyn GraphicsDevice, location: i32) {
        device.uniform_1i(location, *self);
    }
}

impl UniformValue for Vector2<f32> {
    const TYPE: UniformType = UniformType::Vec2;

    fn write(&self, device: &dyn GraphicsDevice, location: i32) {
        device.uniform_2f(location, self.x, self.y);
    }
}

impl UniformValue for Vector3<f32> {
    const TYPE: UniformType = UniformType::Vec3;

    fn write(&self, device: &dyn GraphicsDevice, location: i32) {
        device.uniform_3f(location, self.x, self.y, self.z);
    }
}

impl UniformValue for Vector4<f32> {
    const TYPE: UniformType = UniformType::Vec4;

    fn write(&self, device: &dyn GraphicsDevice, location: i32) {
        device.uniform_4f(location, self.x, self.y, self.z, self.w);
    }
}

impl UniformValue for Matrix4<f32> {
    const TYPE: UniformType = UniformType::Mat4;

    fn write(&self, device: &dyn GraphicsDevice, location: i32) {
        device.uniform_matrix4(location, self.as_ref());
    }
}
