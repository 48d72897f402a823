use glam::Vec3;
use roadfly_input::{LockEvent, LockState};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    #[error("pointer capture denied by host: {0}")]
    Denied(String),
    #[error("camera controls already disposed")]
    Disposed,
}

/// The camera-control capability the movement integrator depends on.
///
/// Implementors own the camera transform. Lock transitions are queued by the
/// implementor and handed out through [`CameraControl::drain_lock_events`].
pub trait CameraControl {
    fn position(&self) -> Vec3;

    fn position_mut(&mut self) -> &mut Vec3;

    /// Move along the camera's forward direction, projected on the ground plane.
    fn move_forward(&mut self, distance: f32);

    /// Move along the camera's right direction.
    fn move_right(&mut self, distance: f32);

    /// Request pointer capture.
    fn lock(&mut self) -> Result<(), LockError>;

    fn unlock(&mut self);

    fn lock_state(&self) -> LockState;

    fn drain_lock_events(&mut self) -> Vec<LockEvent>;

    /// Release host resources. Later `lock` calls fail with [`LockError::Disposed`].
    fn dispose(&mut self);
}
