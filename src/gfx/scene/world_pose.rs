// src/gfx/scene/world_pose.rs
use cgmath::*;

/// Placement of an object in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for WorldPose {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl WorldPose {
    /// Model matrix: scale, then rotate, then translate.
    pub fn compute_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Applies a rotation in world space, pitch (X) first and roll (Z) last.
    /// Angles in radians.
    pub fn rotate_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        let delta = Quaternion::from_angle_z(Rad(roll))
            * Quaternion::from_angle_y(Rad(yaw))
            * Quaternion::from_angle_x(Rad(pitch));
        self.rotation = (delta * self.rotation).normalize();
    }

    /// Applies a world-space rotation of `angle` radians around `axis`.
    pub fn rotate_axis(&mut self, angle: f32, axis: Vector3<f32>) {
        let delta = Quaternion::from_axis_angle(axis.normalize(), Rad(angle));
        self.rotation = (delta * self.rotation).normalize();
    }

    /// Current rotation as Euler angles in degrees.
    pub fn euler_degrees(&self) -> Vector3<f32> {
        let euler = Euler::from(self.rotation);
        Vector3::new(
            Deg::from(euler.x).0,
            Deg::from(euler.y).0,
            Deg::from(euler.z).0,
        )
    }

    /// Replaces the rotation with Euler angles in degrees, the inverse of
    /// [`euler_degrees`](Self::euler_degrees).
    pub fn set_euler_degrees(&mut self, degrees: Vector3<f32>) {
        self.rotation = Quaternion::from(Euler::new(
            Deg(degrees.x),
            Deg(degrees.y),
            Deg(degrees.z),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(WorldPose::default().compute_transform(), Matrix4::identity());
    }

    #[test]
    fn test_transform_order() {
        let mut pose = WorldPose {
            scale: Vector3::new(2.0, 2.0, 2.0),
            ..Default::default()
        };
        pose.rotate_axis(FRAC_PI_2, Vector3::unit_y());
        pose.translate(Vector3::new(0.0, 0.0, 5.0));

        let p = pose.compute_transform() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_vec_eq(p.truncate(), Vector3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_rotate_euler_applies_pitch_first() {
        let mut pose = WorldPose::default();
        // Pitch takes +Y to +Z, then yaw takes +Z to +X.
        pose.rotate_euler(FRAC_PI_2, FRAC_PI_2, 0.0);
        assert_vec_eq(pose.rotation * Vector3::unit_y(), Vector3::unit_x());
    }

    #[test]
    fn test_rotations_stay_normalised() {
        let mut pose = WorldPose::default();
        for _ in 0..1000 {
            pose.rotate_axis(0.01, Vector3::new(0.5, 1.0, 0.0));
            pose.rotate_euler(0.003, 0.002, 0.001);
        }
        assert!((pose.rotation.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_euler_degrees_round_trip() {
        let mut pose = WorldPose::default();
        pose.set_euler_degrees(Vector3::new(30.0, -45.0, 10.0));
        assert_vec_eq(pose.euler_degrees(), Vector3::new(30.0, -45.0, 10.0));
    }
}
