// src/gfx/camera/arcball.rs
//! # Arcball Controller
//!
//! Orbits a point at a given distance using spherical coordinates. The
//! azimuth turns around the world Y axis and the elevation tilts towards the
//! poles; elevation is kept away from the poles so the view never flips.
//!
//! ```text
//! position = target + distance * (cos(e) cos(a), sin(e), cos(e) sin(a))
//! ```

use cgmath::*;

/// Limits applied by [`ArcballController::zoom`] and
/// [`ArcballController::rotate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcballBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,
}

impl Default for ArcballBounds {
    fn default() -> Self {
        Self {
            min_distance: 0.5,
            max_distance: 50.0,
            min_elevation: -1.5,
            max_elevation: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcballController {
    pub target: Point3<f32>,
    pub distance: f32,
    /// Radians around the Y axis
    pub azimuth: f32,
    /// Radians above the horizon
    pub elevation: f32,
    pub bounds: ArcballBounds,
    was_mouse_down: bool,
    last_mouse_pos: Vector2<f32>,
}

impl Default for ArcballController {
    fn default() -> Self {
        Self {
            target: Point3::origin(),
            distance: 5.0,
            azimuth: 0.0,
            elevation: 0.0,
            bounds: ArcballBounds::default(),
            was_mouse_down: false,
            last_mouse_pos: Vector2::zero(),
        }
    }
}

impl ArcballController {
    /// Radians per pixel of mouse travel used by [`update`](Self::update).
    pub const DEFAULT_SENSITIVITY: f32 = 0.005;

    pub fn position(&self) -> Point3<f32> {
        let (sin_e, cos_e) = self.elevation.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + self.distance * Vector3::new(cos_e * cos_a, sin_e, cos_e * sin_a)
    }

    /// Moves away from the target by `delta` (towards it when negative).
    pub fn zoom(&mut self, delta: f32) {
        self.distance =
            (self.distance + delta).clamp(self.bounds.min_distance, self.bounds.max_distance);
    }

    pub fn rotate(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation = (self.elevation + delta_elevation)
            .clamp(self.bounds.min_elevation, self.bounds.max_elevation);
    }

    /// Places the controller so that [`position`](Self::position) returns
    /// `position` while orbiting `target`.
    ///
    /// When the two points (nearly) coincide the angles are left unchanged.
    pub fn set_from_position_and_target(&mut self, position: Point3<f32>, target: Point3<f32>) {
        self.target = target;
        let offset = position - target;
        self.distance = offset.magnitude();

        if self.distance > 0.001 {
            let dir = offset / self.distance;
            self.azimuth = dir.z.atan2(dir.x);
            self.elevation = dir.y.clamp(-1.0, 1.0).asin();
        }
    }

    /// Per-frame input step.
    ///
    /// Dragging with the button held rotates by the cursor travel since the
    /// previous held frame; the first held frame only records the cursor.
    /// A non-zero `zoom_delta` zooms by that amount.
    pub fn update(
        &mut self,
        mouse_down: bool,
        mouse_pos: Vector2<f32>,
        zoom_delta: f32,
        sensitivity: f32,
    ) {
        if mouse_down {
            if self.was_mouse_down {
                let delta = mouse_pos - self.last_mouse_pos;
                self.rotate(delta.x * sensitivity, delta.y * sensitivity);
            }
            self.last_mouse_pos = mouse_pos;
        }
        self.was_mouse_down = mouse_down;

        if zoom_delta != 0.0 {
            self.zoom(zoom_delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point3<f32>, b: Point3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_position() {
        let arcball = ArcballController::default();
        assert_point_eq(arcball.position(), Point3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut arcball = ArcballController::default();
        arcball.zoom(-100.0);
        assert_eq!(arcball.distance, 0.5);
        arcball.zoom(1000.0);
        assert_eq!(arcball.distance, 50.0);
        arcball.zoom(-10.0);
        assert_eq!(arcball.distance, 40.0);
    }

    #[test]
    fn test_elevation_is_clamped() {
        let mut arcball = ArcballController::default();
        arcball.rotate(0.25, 10.0);
        assert_eq!(arcball.elevation, 1.5);
        assert_eq!(arcball.azimuth, 0.25);
        arcball.rotate(0.0, -10.0);
        assert_eq!(arcball.elevation, -1.5);
    }

    #[test]
    fn test_set_from_position_round_trips() {
        let mut arcball = ArcballController::default();
        let target = Point3::new(0.0, 1.0, 0.0);
        let position = Point3::new(0.0, 2.5, 3.0);
        arcball.set_from_position_and_target(position, target);

        assert_eq!(arcball.target, target);
        assert!((arcball.distance - (1.5f32 * 1.5 + 9.0).sqrt()).abs() < 1e-5);
        assert_point_eq(arcball.position(), position);
    }

    #[test]
    fn test_coincident_points_keep_angles() {
        let mut arcball = ArcballController::default();
        arcball.rotate(0.7, 0.3);
        let point = Point3::new(1.0, 1.0, 1.0);
        arcball.set_from_position_and_target(point, point);
        assert_eq!(arcball.azimuth, 0.7);
        assert_eq!(arcball.elevation, 0.3);
        assert_eq!(arcball.distance, 0.0);
    }

    #[test]
    fn test_drag_rotates_from_second_frame() {
        let mut arcball = ArcballController::default();
        let sensitivity = ArcballController::DEFAULT_SENSITIVITY;

        // Cursor moved while released: no rotation on press.
        arcball.update(false, Vector2::new(500.0, 500.0), 0.0, sensitivity);
        arcball.update(true, Vector2::new(100.0, 100.0), 0.0, sensitivity);
        assert_eq!((arcball.azimuth, arcball.elevation), (0.0, 0.0));

        arcball.update(true, Vector2::new(140.0, 80.0), 0.0, sensitivity);
        assert!((arcball.azimuth - 40.0 * sensitivity).abs() < 1e-6);
        assert!((arcball.elevation + 20.0 * sensitivity).abs() < 1e-6);

        // Release and press again elsewhere: no jump.
        arcball.update(false, Vector2::new(0.0, 0.0), 0.0, sensitivity);
        let before = arcball.azimuth;
        arcball.update(true, Vector2::new(900.0, 0.0), 0.0, sensitivity);
        assert_eq!(arcball.azimuth, before);
    }

    #[test]
    fn test_update_zooms_by_wheel_delta() {
        let mut arcball = ArcballController::default();
        arcball.update(true, Vector2::new(0.0, 0.0), 0.0, 0.005);
        // Large cursor travel must not leak into the zoom amount.
        arcball.update(true, Vector2::new(0.0, 300.0), -2.0, 0.0);
        assert_eq!(arcball.distance, 3.0);
    }
}
