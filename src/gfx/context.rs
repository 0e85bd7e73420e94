// src/gfx/context.rs
//! Per-context graphics state shared by every resource wrapper.

use std::cell::Cell;
use std::rc::Rc;

use super::device::GraphicsDevice;
use crate::logging::LogHandle;

/// Shared handle to a [`GfxContext`]. Resources keep one so they can release
/// their handles on drop.
pub type Gfx = Rc<GfxContext>;

/// Driver, log handle and the single-bound-program flag of one GL context.
///
/// Not `Send`: every call must come from the thread that made the context
/// current.
pub struct GfxContext {
    device: Rc<dyn GraphicsDevice>,
    program_bound: Cell<bool>,
    log: LogHandle,
}

impl GfxContext {
    /// Shared context with no program bound.
    ///
    /// # Arguments
    /// * `device` - Backend every resource issues its calls to
    /// * `log` - Handle for resource warnings
    pub fn new(device: Rc<dyn GraphicsDevice>, log: LogHandle) -> Gfx {
        Rc::new(Self {
            device,
            program_bound: Cell::new(false),
            log,
        })
    }

    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    pub fn log(&self) -> &LogHandle {
        &self.log
    }

    /// Whether a [`BoundProgram`](crate::gfx::resources::BoundProgram) is
    /// currently alive on this context.
    pub fn is_program_bound(&self) -> bool {
        self.program_bound.get()
    }

    pub(crate) fn set_program_bound(&self, bound: bool) {
        self.program_bound.set(bound);
    }
}
