// src/gfx/camera/camera.rs
use cgmath::*;

/// Perspective look-at camera using GL clip conventions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            fov: 75.0,
            aspect_ratio: 16.0 / 9.0,
            near_plane: 0.1,
            far_plane: 100.0,
        }
    }
}

impl Camera {
    /// Creates a camera with the default lens.
    ///
    /// # Arguments
    /// * `position` - Eye position in world space
    /// * `target` - Point the camera looks at
    pub fn new(position: Point3<f32>, target: Point3<f32>) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(
            Deg(self.fov),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }

    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(self.up).normalize()
    }

    /// Updates the aspect ratio from a framebuffer size. A zero height (a
    /// minimised window) leaves it unchanged.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 3.0));
        assert_eq!(camera.fov, 75.0);
        assert_eq!(camera.near_plane, 0.1);
        assert_eq!(camera.far_plane, 100.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_basis_vectors() {
        let camera = Camera::default();
        assert_vec_eq(camera.forward(), -Vector3::unit_z());
        assert_vec_eq(camera.right(), Vector3::unit_x());
    }

    #[test]
    fn test_view_matrix_moves_target_to_negative_z() {
        let camera = Camera::new(Point3::new(0.0, 2.5, 3.0), Point3::origin());
        let eye_space = camera.view_matrix() * camera.target.to_homogeneous();
        assert!(eye_space.z < 0.0);
        assert!(eye_space.x.abs() < 1e-5);
        assert!(eye_space.y.abs() < 1e-5);
    }

    #[test]
    fn test_projection_depth_range() {
        let camera = Camera::default();
        let projection = camera.projection_matrix();
        let near = projection * Vector4::new(0.0, 0.0, -camera.near_plane, 1.0);
        let far = projection * Vector4::new(0.0, 0.0, -camera.far_plane, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.resize_projection(800, 400);
        assert_eq!(camera.aspect_ratio, 2.0);
        camera.resize_projection(800, 0);
        assert_eq!(camera.aspect_ratio, 2.0);
    }
}
