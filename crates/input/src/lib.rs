//! Input layer: key bindings, held-direction flags, and the event source the
//! movement integrator subscribes to.
//!
//! # Invariants
//! - Raw host key identifiers (`"w"`, `"ArrowUp"`) are mapped to directions
//!   here and nowhere else.
//! - The input source is injected; nothing in this crate touches a window.

pub mod bindings;
pub mod lock;
pub mod pressed;
pub mod source;

pub use bindings::{KeyBindings, MoveDirection, ParseDirectionError};
pub use lock::{LockEvent, LockObserver, LockState, NoopLockObserver, ResumePrompt};
pub use pressed::PressedKeys;
pub use source::{InputEvent, InputQueue, InputSource, SubscriptionId};

pub fn crate_info() -> &'static str {
    "roadfly-input v0.1.0"
}
