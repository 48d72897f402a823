use std::cell::Cell;
use std::rc::Rc;

/// Pointer-capture state of a camera-control object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    Locked,
    #[default]
    Unlocked,
}

/// Transition notifications emitted when the capture state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEvent {
    Lock,
    Unlock,
}

/// Observer for pointer-capture transitions.
pub trait LockObserver {
    fn on_lock(&mut self) {}
    fn on_unlock(&mut self) {}
}

#[derive(Debug, Default)]
pub struct NoopLockObserver;

impl LockObserver for NoopLockObserver {}

/// "Click to resume" prompt visibility.
///
/// Clones share the same flag, so the app can keep one handle for drawing
/// while the controls own another as their lock observer. Starts visible.
#[derive(Debug, Clone)]
pub struct ResumePrompt {
    visible: Rc<Cell<bool>>,
}

impl Default for ResumePrompt {
    fn default() -> Self {
        Self {
            visible: Rc::new(Cell::new(true)),
        }
    }
}

impl ResumePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl LockObserver for ResumePrompt {
    fn on_lock(&mut self) {
        self.visible.set(false);
    }

    fn on_unlock(&mut self) {
        self.visible.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_follows_lock_state() {
        let prompt = ResumePrompt::new();
        let mut observer = prompt.clone();
        assert!(prompt.is_visible());
        observer.on_lock();
        assert!(!prompt.is_visible());
        observer.on_unlock();
        assert!(prompt.is_visible());
    }

    #[test]
    fn default_state_is_unlocked() {
        assert_eq!(LockState::default(), LockState::Unlocked);
    }
}
