//! Pointer-lock camera controls: mouse look while the pointer is captured,
//! plus ground-plane relative movement.

use crate::camera::FirstPersonCamera;
use crate::control::{CameraControl, LockError};
use glam::Vec3;
use roadfly_input::{LockEvent, LockState};
use std::f32::consts::FRAC_PI_2;

/// Host-side pointer capture (cursor grab on desktop).
pub trait PointerGrab {
    fn grab(&mut self) -> Result<(), LockError>;
    fn release(&mut self);
}

/// Grab backend for headless runs and tests: capture is always granted.
#[derive(Debug, Default)]
pub struct HeadlessGrab;

impl PointerGrab for HeadlessGrab {
    fn grab(&mut self) -> Result<(), LockError> {
        Ok(())
    }

    fn release(&mut self) {}
}

pub struct PointerLockControls<G: PointerGrab> {
    camera: FirstPersonCamera,
    grab: G,
    state: LockState,
    events: Vec<LockEvent>,
    disposed: bool,
    /// Multiplier on the 0.002 rad/pixel base look sensitivity.
    pub pointer_speed: f32,
}

impl<G: PointerGrab> PointerLockControls<G> {
    pub fn new(camera: FirstPersonCamera, grab: G) -> Self {
        Self {
            camera,
            grab,
            state: LockState::Unlocked,
            events: Vec::new(),
            disposed: false,
            pointer_speed: 1.0,
        }
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FirstPersonCamera {
        &mut self.camera
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Apply a relative mouse motion. Ignored unless the pointer is locked.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if self.state != LockState::Locked {
            return;
        }
        self.camera.yaw -= dx * 0.002 * self.pointer_speed;
        self.camera.pitch -= dy * 0.002 * self.pointer_speed;
        self.camera.pitch = self.camera.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

impl<G: PointerGrab> CameraControl for PointerLockControls<G> {
    fn position(&self) -> Vec3 {
        self.camera.position
    }

    fn position_mut(&mut self) -> &mut Vec3 {
        &mut self.camera.position
    }

    fn move_forward(&mut self, distance: f32) {
        let dir = self.camera.ground_forward();
        self.camera.position += dir * distance;
    }

    fn move_right(&mut self, distance: f32) {
        let dir = self.camera.right();
        self.camera.position += dir * distance;
    }

    fn lock(&mut self) -> Result<(), LockError> {
        if self.disposed {
            return Err(LockError::Disposed);
        }
        if self.state == LockState::Locked {
            return Ok(());
        }
        self.grab.grab()?;
        self.state = LockState::Locked;
        self.events.push(LockEvent::Lock);
        Ok(())
    }

    fn unlock(&mut self) {
        if self.state != LockState::Locked {
            return;
        }
        self.grab.release();
        self.state = LockState::Unlocked;
        self.events.push(LockEvent::Unlock);
    }

    fn lock_state(&self) -> LockState {
        self.state
    }

    fn drain_lock_events(&mut self) -> Vec<LockEvent> {
        std::mem::take(&mut self.events)
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if self.state == LockState::Locked {
            self.grab.release();
            self.state = LockState::Unlocked;
        }
        self.events.clear();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DenyGrab;

    impl PointerGrab for DenyGrab {
        fn grab(&mut self) -> Result<(), LockError> {
            Err(LockError::Denied("not focused".into()))
        }

        fn release(&mut self) {}
    }

    fn controls() -> PointerLockControls<HeadlessGrab> {
        PointerLockControls::new(FirstPersonCamera::default(), HeadlessGrab)
    }

    #[test]
    fn lock_and_unlock_emit_events() {
        let mut c = controls();
        c.lock().unwrap();
        assert_eq!(c.lock_state(), LockState::Locked);
        c.lock().unwrap();
        c.unlock();
        c.unlock();
        assert_eq!(c.drain_lock_events(), vec![LockEvent::Lock, LockEvent::Unlock]);
        assert!(c.drain_lock_events().is_empty());
    }

    #[test]
    fn denied_grab_stays_unlocked() {
        let mut c = PointerLockControls::new(FirstPersonCamera::default(), DenyGrab);
        assert!(matches!(c.lock(), Err(LockError::Denied(_))));
        assert_eq!(c.lock_state(), LockState::Unlocked);
        assert!(c.drain_lock_events().is_empty());
    }

    #[test]
    fn look_requires_lock() {
        let mut c = controls();
        c.look(100.0, 100.0);
        assert_eq!(c.camera().yaw, 0.0);
        c.lock().unwrap();
        c.look(100.0, 0.0);
        assert!((c.camera().yaw + 0.2).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut c = controls();
        c.lock().unwrap();
        c.look(0.0, -10_000.0);
        assert_eq!(c.camera().pitch, FRAC_PI_2);
        c.look(0.0, 10_000.0);
        assert_eq!(c.camera().pitch, -FRAC_PI_2);
    }

    #[test]
    fn relative_moves_follow_heading() {
        let mut c = controls();
        c.move_forward(2.0);
        c.move_right(1.0);
        assert!((c.position() - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn dispose_blocks_further_locks() {
        let mut c = controls();
        c.lock().unwrap();
        c.dispose();
        assert!(c.is_disposed());
        assert_eq!(c.lock_state(), LockState::Unlocked);
        assert_eq!(c.lock(), Err(LockError::Disposed));
        assert!(c.drain_lock_events().is_empty());
    }
}
