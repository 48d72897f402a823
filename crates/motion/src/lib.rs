//! Movement: keyboard-driven velocity integrator and the camera-control
//! abstraction it drives.
//!
//! # Invariants
//! - The integrator only talks to the camera through [`CameraControl`].
//! - Velocity decays toward zero when no direction is held.
//! - The movement constraint runs inside `update`, before anything else can
//!   read the new camera position.

pub mod camera;
pub mod clock;
pub mod config;
pub mod constraint;
pub mod control;
pub mod controls;
pub mod pointer_lock;

pub use camera::FirstPersonCamera;
pub use clock::FrameClock;
pub use config::{ConfigError, ControlsConfig};
pub use constraint::{
    BoundaryConstraint, MovementConstraint, SharedBounds, Unconstrained, clamp_to_bounds,
};
pub use control::{CameraControl, LockError};
pub use controls::Controls;
pub use pointer_lock::{HeadlessGrab, PointerGrab, PointerLockControls};

pub fn crate_info() -> &'static str {
    "roadfly-motion v0.1.0"
}
