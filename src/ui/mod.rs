//! # User Interface Module
//!
//! Dear ImGui overlay for the demos.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui context, winit platform glue and the glow renderer
//! - [`panel`] - the "Controls" panel over [`UiState`] and the
//!   "Perf Monitor" plot
//!
//! ## Input Handling
//!
//! Every window event reaches ImGui first. While ImGui wants the mouse the
//! application reports it through
//! [`FrameInput::ui_wants_mouse`](crate::app::FrameInput::ui_wants_mouse) and
//! demos skip their own camera controls.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{draw_controls, perf_monitor, UiState};
