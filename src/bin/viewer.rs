// src/bin/viewer.rs
//! Textured OBJ viewer with an arcball camera and the control panel.
//!
//! ```text
//! viewer [model.obj]
//! ```

use std::process::ExitCode;

use anyhow::Context as _;
use cgmath::EuclideanSpace;
use sandbox3d::prelude::*;

/// Orbit distance change per wheel line.
const ZOOM_STEP: f32 = 0.5;

struct Scene {
    program: ShaderProgram,
    model: LoadedObject,
}

struct Viewer {
    config: ViewerConfig,
    camera: Camera,
    arcball: ArcballController,
    ui_state: UiState,
    history: FrameHistory,
    scene: Option<Scene>,
}

impl Viewer {
    fn new(config: ViewerConfig, clear_colour: [f32; 4]) -> Self {
        let camera = Camera::new(config.camera_position, Point3::from_vec(config.orbit_offset));
        let ui_state = UiState::new(&camera, clear_colour);
        Self {
            config,
            camera,
            arcball: ArcballController::default(),
            ui_state,
            history: FrameHistory::new(),
            scene: None,
        }
    }

    fn sync_arcball(&mut self) {
        self.arcball
            .set_from_position_and_target(self.camera.position, self.camera.target);
    }
}

impl Demo for Viewer {
    fn title(&self) -> &str {
        "Model Viewer"
    }

    fn init(&mut self, gfx: &Gfx, (width, height): (u32, u32)) -> sandbox3d::Result<()> {
        let program = ShaderProgram::from_files(
            gfx,
            &self.config.vertex_shader,
            None,
            &self.config.fragment_shader,
        )?;

        let mut model = LoadedObject::load(gfx, &self.config.model_path)?;
        let scale = self.config.model_scale;
        model.pose.scale = Vector3::new(scale, scale, scale);
        log::info!(
            "Loaded {} with {} shapes and {} textures",
            self.config.model_path.display(),
            model.shapes.len(),
            model.texture_count()
        );

        {
            let mut bound = program.bind()?;
            model.set_init_uniforms(&mut bound);
        }

        self.camera.target = Point3::from_vec(model.pose.position + self.config.orbit_offset);
        self.camera.resize_projection(width, height);
        self.ui_state = UiState::new(&self.camera, self.ui_state.clear_colour);
        self.sync_arcball();

        self.scene = Some(Scene { program, model });
        Ok(())
    }

    fn update(&mut self, dt: f32, input: &FrameInput) {
        if let Some(aspect) = input.aspect_ratio() {
            self.camera.aspect_ratio = aspect;
        }

        if let Some(scene) = self.scene.as_mut() {
            let pose = &mut scene.model.pose;
            let state = &mut self.ui_state;
            if state.auto_rotate {
                state.time += dt;
                let axis = Vector3::from(state.rotation_axis);
                if axis.magnitude2() > f32::EPSILON {
                    pose.rotate_axis(dt * state.rotation_speed, axis);
                }
                state.manual_rotation = pose.euler_degrees().into();
            } else {
                pose.set_euler_degrees(Vector3::from(state.manual_rotation));
            }
        }

        if !input.ui_wants_mouse {
            self.arcball.update(
                input.mouse_down,
                input.cursor,
                -input.scroll * ZOOM_STEP,
                ArcballController::DEFAULT_SENSITIVITY,
            );
            self.camera.position = self.arcball.position();
            self.camera.target = self.arcball.target;
        }
    }

    fn render(&mut self, _gfx: &Gfx) -> sandbox3d::Result<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };

        let mut bound = scene.program.bind()?;
        bound.set_uniform("view", self.camera.view_matrix());
        bound.set_uniform("projection", self.camera.projection_matrix());
        bound.set_uniform("viewPos", self.camera.position.to_vec());
        scene.model.draw(&mut bound);
        Ok(())
    }

    fn ui(&mut self, ui: &Ui) {
        if draw_controls(ui, &mut self.ui_state, &mut self.camera) {
            self.sync_arcball();
        }
        perf_monitor(ui, &mut self.history, &mut self.ui_state.show_perf_monitor);
    }

    fn clear_colour(&self) -> Option<[f32; 4]> {
        Some(self.ui_state.clear_colour)
    }
}

fn run(log: LogHandle) -> anyhow::Result<()> {
    let config = ViewerConfig::from_args(std::env::args());
    let app_config = AppConfig::new("Model Viewer");
    let viewer = Viewer::new(config, app_config.clear_colour);

    SandboxApp::new(app_config, viewer, log)
        .run()
        .context("model viewer stopped")?;
    Ok(())
}

fn main() -> ExitCode {
    let sink = LogSink::new();
    let log = sink.handle();
    if let Err(e) = sandbox3d::logging::install(log.clone()) {
        log.log_forced(format!("Logger already installed: {e}"));
    }

    let code = match run(log.clone()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log.log_forced(format!(">>> ERROR: {error:#}"));
            ExitCode::from(1)
        }
    };

    sink.shutdown();
    code
}
