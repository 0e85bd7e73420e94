// src/ui/manager.rs
//! Dear ImGui integration: context, winit platform glue and the glow
//! renderer that draws the overlay on top of the scene.

use std::rc::Rc;
use std::time::Instant;

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_glow_renderer::{glow, AutoRenderer};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

use crate::error::{IrrecoverableError, Result};

/// ImGui UI manager
///
/// Owns the ImGui context and the renderer. The renderer also owns the
/// `glow::Context`, so the rest of the application borrows it from here
/// through [`UiManager::gl_context`].
pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: AutoRenderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// Uses the light style and the default font at `font_size` pixels. DPI
    /// is locked to 1.0 so ImGui coordinates match framebuffer pixels.
    ///
    /// # Arguments
    /// * `gl` - Loaded GL functions; the renderer takes ownership
    /// * `window` - Window for platform integration
    /// * `font_size` - Default font size in pixels
    pub fn new(gl: glow::Context, window: &Window, font_size: f32) -> Result<Self> {
        let mut context = Context::create();
        context.set_ini_filename(None);
        context.style_mut().use_light_colors();

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer = AutoRenderer::new(gl, &mut context).map_err(|e| {
            IrrecoverableError::Ui(format!("renderer setup: {e}"))
        })?;

        Ok(Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        })
    }

    /// The GL function table shared with the scene renderer.
    pub fn gl_context(&self) -> &Rc<glow::Context> {
        self.renderer.gl_context()
    }

    /// Feeds a window event to ImGui.
    ///
    /// Returns true if the UI wants the mouse or keyboard after the event.
    pub fn handle_event(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> bool {
        let event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform.handle_event(self.context.io_mut(), window, &event);

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// True while the cursor is over an ImGui window or an item is active.
    pub fn wants_mouse(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    /// Builds one UI frame with `run_ui` and draws it over the current
    /// framebuffer contents.
    pub fn frame<F>(&mut self, window: &Window, run_ui: F) -> Result<()>
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        self.platform
            .prepare_frame(self.context.io_mut(), window)
            .map_err(|e| IrrecoverableError::Ui(format!("prepare frame: {e}")))?;

        let ui = self.context.new_frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return Ok(());
        }

        self.renderer
            .render(draw_data)
            .map_err(|e| IrrecoverableError::Ui(format!("render: {e}")))
    }
}
