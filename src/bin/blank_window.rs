// src/bin/blank_window.rs
//! Opens a window and clears it every frame.

use std::process::ExitCode;

use anyhow::Context as _;
use sandbox3d::prelude::*;

struct BlankWindow;

impl Demo for BlankWindow {
    fn title(&self) -> &str {
        "Blank Window"
    }

    fn init(&mut self, _gfx: &Gfx, (width, height): (u32, u32)) -> sandbox3d::Result<()> {
        log::info!("Framebuffer is {width}x{height}");
        Ok(())
    }

    fn update(&mut self, _dt: f32, _input: &FrameInput) {}

    fn render(&mut self, _gfx: &Gfx) -> sandbox3d::Result<()> {
        Ok(())
    }
}

fn run(log: LogHandle) -> anyhow::Result<()> {
    SandboxApp::new(AppConfig::new("Blank Window"), BlankWindow, log)
        .run()
        .context("blank window stopped")?;
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
