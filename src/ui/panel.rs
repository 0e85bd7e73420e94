// src/ui/panel.rs
//! Control panel and frame-rate monitor drawn by the demos.
//!
//! The panel edits a [`UiState`] and the [`Camera`] directly; the demo reads
//! the state back each frame and applies it to the scene.

use cgmath::Point3;
use imgui::{Drag, TreeNodeFlags, Ui};

use crate::gfx::camera::Camera;
use crate::performance::FrameHistory;

/// Camera placement restored by "Reset Camera".
const DEFAULT_FOV: f32 = 75.0;
const DEFAULT_NEAR: f32 = 0.1;
const DEFAULT_FAR: f32 = 100.0;

/// Values edited by the control panel.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub clear_colour: [f32; 4],
    /// Seconds of animation time, advanced by the demo while auto-rotating
    pub time: f32,
    pub show_controls: bool,
    pub show_demo_window: bool,
    pub show_perf_monitor: bool,

    pub auto_rotate: bool,
    /// Radians per second
    pub rotation_speed: f32,
    pub rotation_axis: [f32; 3],
    /// Euler angles in degrees used while auto-rotate is off
    pub manual_rotation: [f32; 3],

    pub initial_camera_position: Point3<f32>,
    pub initial_camera_target: Point3<f32>,
}

impl UiState {
    /// Panel state remembering `camera`'s placement for "Reset Camera".
    ///
    /// # Arguments
    /// * `camera` - Camera whose current placement "Reset Camera" restores
    /// * `clear_colour` - Initial RGBA clear colour
    pub fn new(camera: &Camera, clear_colour: [f32; 4]) -> Self {
        Self {
            clear_colour,
            time: 0.0,
            show_controls: true,
            show_demo_window: false,
            show_perf_monitor: true,
            auto_rotate: true,
            rotation_speed: 1.0,
            rotation_axis: [0.0, 1.0, 0.0],
            manual_rotation: [0.0; 3],
            initial_camera_position: camera.position,
            initial_camera_target: camera.target,
        }
    }

    pub fn reset_rotation(&mut self) {
        self.manual_rotation = [0.0; 3];
    }

    pub fn reset_time(&mut self) {
        self.time = 0.0;
    }

    /// Restores the initial placement and the default lens.
    pub fn reset_camera(&self, camera: &mut Camera) {
        camera.position = self.initial_camera_position;
        camera.target = self.initial_camera_target;
        camera.fov = DEFAULT_FOV;
        camera.near_plane = DEFAULT_NEAR;
        camera.far_plane = DEFAULT_FAR;
    }
}

/// Draws the "Controls" window.
///
/// Returns true when the camera was edited through the panel this frame, so
/// the caller can resynchronise any controller driving it.
pub fn draw_controls(ui: &Ui, state: &mut UiState, camera: &mut Camera) -> bool {
    if !state.show_controls {
        return false;
    }

    let mut open = state.show_controls;
    let mut camera_edited = false;
    ui.window("Controls")
        .opened(&mut open)
        .size([360.0, 520.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .build(|| {
            let framerate = ui.io().framerate;
            ui.text(format!(
                "Application average {:.3} ms/frame ({:.1} FPS)",
                1000.0 / framerate.max(f32::EPSILON),
                framerate
            ));
            ui.separator();

            if ui.collapsing_header("Renderer", TreeNodeFlags::DEFAULT_OPEN) {
                let c = &mut state.clear_colour;
                let mut rgb = [c[0], c[1], c[2]];
                if ui.color_edit3("Clear Color", &mut rgb) {
                    c[..3].copy_from_slice(&rgb);
                }
            }

            if ui.collapsing_header("Main Object", TreeNodeFlags::DEFAULT_OPEN) {
                rotation_controls(ui, state);
            }

            if ui.collapsing_header("Camera", TreeNodeFlags::DEFAULT_OPEN) {
                camera_edited = camera_controls(ui, state, camera);
            }

            ui.separator();
            ui.checkbox("Show Perf Monitor", &mut state.show_perf_monitor);
            ui.checkbox("Show ImGui Demo", &mut state.show_demo_window);
        });
    state.show_controls = open;

    if state.show_demo_window {
        ui.show_demo_window(&mut state.show_demo_window);
    }

    camera_edited
}

fn rotation_controls(ui: &Ui, state: &mut UiState) {
    ui.checkbox("Auto Rotate", &mut state.auto_rotate);

    if state.auto_rotate {
        ui.slider("Rotation Speed", 0.0, 10.0, &mut state.rotation_speed);
        ui.slider_config("Rotation Axis", -1.0, 1.0)
            .build_array(&mut state.rotation_axis);
        ui.text(format!("Time: {:.2}", state.time));
        if ui.button("Reset Time") {
            state.reset_time();
        }
    } else {
        let [x, y, z] = &mut state.manual_rotation;
        ui.slider("X Rotation", -180.0, 180.0, x);
        ui.slider("Y Rotation", -180.0, 180.0, y);
        ui.slider("Z Rotation", -180.0, 180.0, z);
        if ui.button("Reset Rotation") {
            state.reset_rotation();
        }
    }
}

fn camera_controls(ui: &Ui, state: &UiState, camera: &mut Camera) -> bool {
    let mut edited = false;

    let mut position: [f32; 3] = camera.position.into();
    if Drag::new("Camera Position")
        .speed(0.1)
        .build_array(ui, &mut position)
    {
        camera.position = Point3::from(position);
        edited = true;
    }

    let mut target: [f32; 3] = camera.target.into();
    if Drag::new("Camera Look-At")
        .speed(0.1)
        .build_array(ui, &mut target)
    {
        camera.target = Point3::from(target);
        edited = true;
    }

    Drag::new("Near Plane")
        .speed(0.01)
        .range(0.001, camera.far_plane)
        .build(ui, &mut camera.near_plane);
    Drag::new("Far Plane")
        .speed(1.0)
        .range(camera.near_plane, 10_000.0)
        .build(ui, &mut camera.far_plane);
    ui.slider("FOV", 1.0, 120.0, &mut camera.fov);

    if ui.button("Reset Camera") {
        state.reset_camera(camera);
        edited = true;
    }

    edited
}

/// Records this frame's rate into `history` and plots it in the
/// "Perf Monitor" window.
pub fn perf_monitor(ui: &Ui, history: &mut FrameHistory, open: &mut bool) {
    history.push(ui.io().framerate);
    if !*open {
        return;
    }

    let (fps, ms) = history.latest();
    ui.window("Perf Monitor")
        .opened(open)
        .size([340.0, 260.0], imgui::Condition::FirstUseEver)
        .position([400.0, 20.0], imgui::Condition::FirstUseEver)
        .build(|| {
            ui.plot_lines("FPS Instant", history.fps())
                .values_offset(history.offset())
                .scale_min(0.0)
                .graph_size([0.0, 80.0])
                .build();
            ui.plot_lines("Frame Time (ms)", history.frame_ms())
                .values_offset(history.offset())
                .scale_min(0.0)
                .graph_size([0.0, 80.0])
                .build();
            ui.text(format!("FPS: {fps:.1}"));
            ui.text(format!("Frame time: {ms:.3} ms"));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_camera_restores_placement_and_lens() {
        let mut camera = Camera::new(Point3::new(0.0, 2.5, 3.0), Point3::new(0.0, 1.0, 0.0));
        let state = UiState::new(&camera, [0.0; 4]);

        camera.position = Point3::new(10.0, 10.0, 10.0);
        camera.target = Point3::new(1.0, 0.0, 0.0);
        camera.fov = 30.0;
        camera.near_plane = 1.0;
        camera.far_plane = 5.0;

        state.reset_camera(&mut camera);
        assert_eq!(camera.position, Point3::new(0.0, 2.5, 3.0));
        assert_eq!(camera.target, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(camera.fov, 75.0);
        assert_eq!(camera.near_plane, 0.1);
        assert_eq!(camera.far_plane, 100.0);
    }

    #[test]
    fn test_reset_rotation_and_time() {
        let mut state = UiState::new(&Camera::default(), [0.0; 4]);
        state.manual_rotation = [10.0, 20.0, 30.0];
        state.time = 4.5;

        state.reset_rotation();
        state.reset_time();
        assert_eq!(state.manual_rotation, [0.0; 3]);
        assert_eq!(state.time, 0.0);
    }

    // ImGui allows one live context per process, so every headless frame
    // lives in this single test.
    #[test]
    fn test_panels_draw_without_input() {
        let mut ctx = imgui::Context::create();
        ctx.set_ini_filename(None);
        ctx.io_mut().display_size = [1280.0, 720.0];
        ctx.io_mut().delta_time = 1.0 / 60.0;
        ctx.fonts().build_rgba32_texture();

        let mut camera = Camera::default();
        let mut state = UiState::new(&camera, [0.2, 0.3, 0.3, 1.0]);
        let before = state.clone();
        let mut history = FrameHistory::new();
        let mut open = true;

        for auto_rotate in [true, false] {
            state.auto_rotate = auto_rotate;
            let ui = ctx.new_frame();
            assert!(!draw_controls(ui, &mut state, &mut camera));
            perf_monitor(ui, &mut history, &mut open);
            ctx.render();
        }

        assert_eq!(state.clear_colour, before.clear_colour);
        assert_eq!(state.manual_rotation, before.manual_rotation);
        assert_eq!(camera.position, before.initial_camera_position);
        assert_eq!(history.offset(), 2);

        // Hidden windows still record history
        state.show_controls = false;
        open = false;
        let ui = ctx.new_frame();
        assert!(!draw_controls(ui, &mut state, &mut camera));
        perf_monitor(ui, &mut history, &mut open);
        ctx.render();
        assert!(!state.show_controls);
        assert_eq!(history.offset(), 3);
    }
}
