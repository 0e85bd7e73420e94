// src/bin/rainbow_cube.rs
//! A vertex-coloured cube spinning about a tilted axis.

use std::process::ExitCode;

use anyhow::Context as _;
use sandbox3d::prelude::*;

const VERTEX_SHADER: &str = "shaders/rainbow/vert.glsl";
const FRAGMENT_SHADER: &str = "shaders/rainbow/frag.glsl";

struct Scene {
    program: ShaderProgram,
    cube: Mesh,
}

struct RainbowCube {
    camera: Camera,
    pose: WorldPose,
    axis: Vector3<f32>,
    time: f32,
    history: FrameHistory,
    show_perf: bool,
    scene: Option<Scene>,
}

impl RainbowCube {
    fn new() -> Self {
        Self {
            camera: Camera::default(),
            pose: WorldPose::default(),
            axis: Vector3::new(0.5, 1.0, 0.0).normalize(),
            time: 0.0,
            history: FrameHistory::new(),
            show_perf: true,
            scene: None,
        }
    }
}

impl Demo for RainbowCube {
    fn title(&self) -> &str {
        "Rainbow Cube"
    }

    fn init(&mut self, gfx: &Gfx, (width, height): (u32, u32)) -> sandbox3d::Result<()> {
        let program = ShaderProgram::from_files(gfx, VERTEX_SHADER, None, FRAGMENT_SHADER)?;
        let cube = Mesh::with_vertices(gfx, &rainbow_cube(), ColorVertex::layout())?;
        self.camera.resize_projection(width, height);
        self.scene = Some(Scene { program, cube });
        Ok(())
    }

    fn update(&mut self, dt: f32, input: &FrameInput) {
        if let Some(aspect) = input.aspect_ratio() {
            self.camera.aspect_ratio = aspect;
        }
        self.time += dt;
        self.pose.rotation = Quaternion::from_axis_angle(self.axis, Rad(self.time));
    }

    fn render(&mut self, _gfx: &Gfx) -> sandbox3d::Result<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };

        let mut bound = scene.program.bind()?;
        bound.set_uniform("model", self.pose.compute_transform());
        bound.set_uniform("view", self.camera.view_matrix());
        bound.set_uniform("projection", self.camera.projection_matrix());
        scene.cube.draw(&bound, Primitive::Triangles);
        Ok(())
    }

    fn ui(&mut self, ui: &Ui) {
        perf_monitor(ui, &mut self.history, &mut self.show_perf);
    }
}

fn run(log: LogHandle) -> anyhow::Result<()> {
    SandboxApp::new(AppConfig::new("Rainbow Cube"), RainbowCube::new(), log)
        .run()
        .context("rainbow cube stopped")?;
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
