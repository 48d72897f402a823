use roadfly_motion::{LockError, PointerGrab};
use std::sync::Arc;
use winit::window::{CursorGrabMode, Window};

/// Pointer capture backed by the window's cursor grab.
pub struct WindowGrab {
    window: Arc<Window>,
}

impl WindowGrab {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl PointerGrab for WindowGrab {
    fn grab(&mut self) -> Result<(), LockError> {
        // Not every platform supports Locked; Confined is the fallback.
        self.window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
            .map_err(|e| LockError::Denied(e.to_string()))?;
        self.window.set_cursor_visible(false);
        Ok(())
    }

    fn release(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            tracing::debug!("cursor release failed: {e}");
        }
        self.window.set_cursor_visible(true);
    }
}
