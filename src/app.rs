// src/app.rs
//! # Application Shell
//!
//! [`SandboxApp`] owns the winit event loop, the GL context and the ImGui
//! overlay, and drives a [`Demo`] once per frame:
//!
//! 1. tick the frame counter
//! 2. clear with the demo's clear colour
//! 3. [`Demo::update`] with this frame's [`FrameInput`]
//! 4. [`Demo::render`]
//! 5. ImGui frame with [`Demo::ui`]
//! 6. swap buffers
//!
//! Escape or closing the window ends the loop. An error from the demo or the
//! context also ends it and is returned from [`SandboxApp::run`].

use std::num::NonZeroU32;
use std::rc::Rc;

use cgmath::Vector2;
use glutin::{
    config::{Config, ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use imgui_glow_renderer::glow;
use raw_window_handle::HasWindowHandle;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::AppConfig;
use crate::error::{IrrecoverableError, Result};
use crate::gfx::{Gfx, GfxContext, GlDevice};
use crate::logging::LogHandle;
use crate::performance::FrameCounter;
use crate::ui::UiManager;

/// Pixels of touchpad travel treated as one wheel line.
const PIXELS_PER_LINE: f32 = 40.0;

/// Input snapshot handed to [`Demo::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Left mouse button held
    pub mouse_down: bool,
    /// Cursor position in physical pixels from the top-left corner
    pub cursor: Vector2<f32>,
    /// Wheel lines scrolled since the previous frame, positive away from the user
    pub scroll: f32,
    /// ImGui is using the mouse; demos should ignore it
    pub ui_wants_mouse: bool,
    /// Drawable size in pixels
    pub framebuffer_size: (u32, u32),
}

impl FrameInput {
    /// Width over height, or `None` while the framebuffer is empty.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let (width, height) = self.framebuffer_size;
        (width > 0 && height > 0).then(|| width as f32 / height as f32)
    }
}

/// A scene driven by [`SandboxApp`].
pub trait Demo {
    fn title(&self) -> &str;

    /// Create GPU resources. Called once, after the context is current.
    fn init(&mut self, gfx: &Gfx, framebuffer_size: (u32, u32)) -> Result<()>;

    /// Advance the simulation by `dt` seconds.
    fn update(&mut self, dt: f32, input: &FrameInput);

    fn render(&mut self, gfx: &Gfx) -> Result<()>;

    /// Build the ImGui overlay for this frame.
    fn ui(&mut self, _ui: &imgui::Ui) {}

    /// Colour to clear to, `None` for [`AppConfig::clear_colour`].
    fn clear_colour(&self) -> Option<[f32; 4]> {
        None
    }
}

/// Window plus event loop running a single [`Demo`].
pub struct SandboxApp<D: Demo> {
    config: AppConfig,
    demo: D,
    log: LogHandle,
}

impl<D: Demo> SandboxApp<D> {
    /// Creates the application; nothing is opened until [`run`](Self::run).
    ///
    /// # Arguments
    /// * `config` - Window size, title and startup clear colour
    /// * `demo` - Scene driven by the event loop
    /// * `log` - Handle every subsystem logs through
    pub fn new(config: AppConfig, demo: D, log: LogHandle) -> Self {
        Self { config, demo, log }
    }

    /// Runs until the window closes. Returns the first error raised inside
    /// the loop.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState::new(self.config, self.demo, self.log);
        event_loop.run_app(&mut state)?;

        match state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Everything tied to the GL context.
///
/// Field order is drop order: the ImGui renderer and the graphics context
/// release GL objects, so they go before the context and surface.
struct Graphics {
    ui: UiManager,
    gfx: Gfx,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

#[derive(Debug)]
struct InputState {
    mouse_down: bool,
    cursor: Vector2<f32>,
    scroll: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mouse_down: false,
            cursor: Vector2::new(0.0, 0.0),
            scroll: 0.0,
        }
    }
}

struct AppState<D: Demo> {
    config: AppConfig,
    log: LogHandle,
    // Dropped before `graphics` so the demo's resources are released while
    // the context is still alive.
    demo: D,
    graphics: Option<Graphics>,
    input: InputState,
    frame_counter: FrameCounter,
    error: Option<IrrecoverableError>,
}

impl<D: Demo> AppState<D> {
    fn new(config: AppConfig, demo: D, log: LogHandle) -> Self {
        let frame_counter = FrameCounter::new(format!("Window '{}'", config.title));
        Self {
            config,
            log,
            demo,
            graphics: None,
            input: InputState::default(),
            frame_counter,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: IrrecoverableError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let graphics = create_graphics(event_loop, &self.config, &self.log)?;
        let PhysicalSize { width, height } = graphics.window.inner_size();
        graphics.gfx.device().viewport(0, 0, width, height);

        log::info!("Initialising '{}'", self.demo.title());
        // Stored first so the context outlives anything `init` creates.
        let graphics = self.graphics.insert(graphics);
        self.demo.init(&graphics.gfx, (width, height))
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(graphics) = self.graphics.as_ref() else {
            return;
        };
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            graphics.surface.resize(&graphics.context, width, height);
            graphics.gfx.device().viewport(0, 0, size.width, size.height);
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(graphics) = self.graphics.as_mut() else {
            return Ok(());
        };

        let dt = self.frame_counter.tick().as_secs_f32();
        let PhysicalSize { width, height } = graphics.window.inner_size();
        let input = FrameInput {
            mouse_down: self.input.mouse_down,
            cursor: self.input.cursor,
            scroll: std::mem::take(&mut self.input.scroll),
            ui_wants_mouse: graphics.ui.wants_mouse(),
            framebuffer_size: (width, height),
        };

        let colour = self
            .demo
            .clear_colour()
            .unwrap_or(self.config.clear_colour);
        graphics.gfx.device().clear(colour);

        self.demo.update(dt, &input);
        self.demo.render(&graphics.gfx)?;

        let demo = &mut self.demo;
        graphics.ui.frame(&graphics.window, |ui| demo.ui(ui))?;

        graphics.surface.swap_buffers(&graphics.context)?;
        Ok(())
    }
}

impl<D: Demo> ApplicationHandler for AppState<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        if let Err(error) = self.start(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };

        // ImGui sees every event; demos check `ui_wants_mouse` themselves
        graphics.ui.handle_event(&graphics.window, window_id, &event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.input.mouse_down = state.is_pressed(),
            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor = Vector2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
            }
            WindowEvent::RedrawRequested => {
                if self.error.is_some() {
                    return;
                }
                if let Err(error) = self.redraw() {
                    self.fail(event_loop, error);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = self.graphics.as_ref() {
            graphics.window.request_redraw();
        }
    }
}

/// Opens the window, creates a core-profile context at the configured
/// version and brings up the device and the ImGui overlay on it.
fn create_graphics(
    event_loop: &ActiveEventLoop,
    config: &AppConfig,
    log: &LogHandle,
) -> Result<Graphics> {
    let window_attributes = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height));

    let template = ConfigTemplateBuilder::new().with_depth_size(24);
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(window_attributes))
        .build(event_loop, template, pick_config)
        .map_err(|e| context_error("window", e))?;
    let window =
        window.ok_or_else(|| IrrecoverableError::ContextCreation("no window was created".into()))?;

    let raw_window_handle = window
        .window_handle()
        .map_err(|e| context_error("window handle", e))?
        .as_raw();

    let (major, minor) = config.gl_version;
    let context_attributes = ContextAttributesBuilder::new()
        .with_profile(GlProfile::Core)
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
        .build(Some(raw_window_handle));

    let gl_display = gl_config.display();
    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .map_err(|e| context_error("context", e))?;

    let surface_attributes = window
        .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
        .map_err(|e| context_error("surface attributes", e))?;
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
        .map_err(|e| context_error("surface", e))?;
    let context = not_current
        .make_current(&surface)
        .map_err(|e| context_error("make current", e))?;

    let interval = if config.vsync {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    };
    if let Err(e) = surface.set_swap_interval(&context, interval) {
        log::warn!("Could not set swap interval: {e}");
    }

    let gl =
        unsafe { glow::Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s)) };
    let ui = UiManager::new(gl, &window, config.font_size)?;

    let device = Rc::new(GlDevice::new(Rc::clone(ui.gl_context())));
    device.apply_default_render_state();
    log::info!("{}", device.describe());
    device.check_error("context setup");

    let gfx = GfxContext::new(device, log.clone());

    Ok(Graphics {
        ui,
        gfx,
        surface,
        context,
        window,
    })
}

fn context_error(what: &str, error: impl std::fmt::Display) -> IrrecoverableError {
    IrrecoverableError::ContextCreation(format!("{what}: {error}"))
}

/// Prefers the config with the most samples among those offered.
///
/// `DisplayBuilder::build` only calls the picker with a non-empty match; an
/// empty one is reported as its own error before this runs.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    most_samples(configs, |config| config.num_samples())
        .expect("glutin offers at least one matching config")
}

/// First item with the highest sample count.
fn most_samples<T>(items: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8) -> Option<T> {
    items.reduce(|best, item| {
        if samples(&item) > samples(&best) {
            item
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        let mut input = FrameInput {
            mouse_down: false,
            cursor: Vector2::new(0.0, 0.0),
            scroll: 0.0,
            ui_wants_mouse: false,
            framebuffer_size: (1280, 720),
        };
        assert_eq!(input.aspect_ratio(), Some(1280.0 / 720.0));

        input.framebuffer_size = (1280, 0);
        assert_eq!(input.aspect_ratio(), None);
    }

    #[test]
    fn test_most_samples_prefers_first_highest() {
        let configs = [("a", 0u8), ("b", 4), ("c", 4), ("d", 2)];
        let picked = most_samples(configs.into_iter(), |&(_, samples)| samples);
        assert_eq!(picked, Some(("b", 4)));

        let none = most_samples(std::iter::empty::<(&str, u8)>(), |&(_, samples)| samples);
        assert_eq!(none, None);
    }
}
