//! Keyboard-driven first-person movement.
//!
//! Each frame the integrator damps the current velocity, accelerates along the
//! held directions, asks the camera control to move, and finally lets the
//! movement constraint correct the result.
//!
//! Velocity is expressed in the camera's local frame where forward is `-Z`:
//! holding "up" drives `velocity.z` toward `-step / damping`.

use crate::clock::FrameClock;
use crate::config::ControlsConfig;
use crate::constraint::{MovementConstraint, Unconstrained};
use crate::control::CameraControl;
use glam::Vec3;
use roadfly_input::{
    InputEvent, InputSource, KeyBindings, LockEvent, LockObserver, LockState, NoopLockObserver,
    PressedKeys, SubscriptionId,
};

pub struct Controls<C: CameraControl> {
    camera: C,
    pub bindings: KeyBindings,
    /// Acceleration while a direction is held, in units/s².
    pub step: f32,
    /// Exponential damping rate, per second.
    pub damping: f32,
    pressed: PressedKeys,
    direction: Vec3,
    velocity: Vec3,
    clock: FrameClock,
    subscription: SubscriptionId,
    observer: Box<dyn LockObserver>,
    constraint: Box<dyn MovementConstraint>,
}

impl<C: CameraControl> Controls<C> {
    /// Take ownership of `camera` and subscribe to `source` for key events.
    pub fn new(camera: C, source: &mut dyn InputSource, config: ControlsConfig) -> Self {
        let subscription = source.subscribe();
        tracing::debug!(step = config.step, damping = config.damping, "controls created");
        Self {
            camera,
            bindings: config.bindings,
            step: config.step,
            damping: config.damping,
            pressed: PressedKeys::default(),
            direction: Vec3::ZERO,
            velocity: Vec3::ZERO,
            clock: FrameClock::new(),
            subscription,
            observer: Box::new(NoopLockObserver),
            constraint: Box::new(Unconstrained),
        }
    }

    pub fn with_lock_observer(mut self, observer: impl LockObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_constraint(mut self, constraint: impl MovementConstraint + 'static) -> Self {
        self.constraint = Box::new(constraint);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.camera.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Normalized direction computed on the last update.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn pressed(&self) -> PressedKeys {
        self.pressed
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn is_locked(&self) -> bool {
        self.camera.lock_state() == LockState::Locked
    }

    /// Request pointer capture. A denial leaves the controls unlocked.
    pub fn lock(&mut self) {
        if let Err(e) = self.camera.lock() {
            tracing::debug!("pointer lock request ignored: {e}");
        }
        self.dispatch_lock_events();
    }

    pub fn unlock(&mut self) {
        self.camera.unlock();
        self.dispatch_lock_events();
    }

    /// Apply every key event queued on `source` and deliver pending lock
    /// transitions to the observer.
    pub fn pump(&mut self, source: &mut dyn InputSource) {
        for event in source.drain(self.subscription) {
            self.apply_key(&event);
        }
        self.dispatch_lock_events();
    }

    fn apply_key(&mut self, event: &InputEvent) {
        let (key, pressed) = match event {
            InputEvent::KeyDown(key) => (key, true),
            InputEvent::KeyUp(key) => (key, false),
        };
        if let Some(direction) = self.bindings.direction_for(key) {
            self.pressed.set(direction, pressed);
        }
    }

    fn dispatch_lock_events(&mut self) {
        for event in self.camera.drain_lock_events() {
            match event {
                LockEvent::Lock => {
                    tracing::info!("pointer locked");
                    self.observer.on_lock();
                }
                LockEvent::Unlock => {
                    tracing::info!("pointer unlocked");
                    self.observer.on_unlock();
                }
            }
        }
    }

    /// Advance one frame. `t_ms` is a monotonically increasing timestamp in
    /// milliseconds.
    pub fn update(&mut self, t_ms: f64) {
        let _span = tracing::info_span!("controls_update").entered();
        let dt = self.clock.delta(t_ms);
        self.integrate(dt);
    }

    /// Advance one frame by an explicit delta in seconds.
    pub fn integrate(&mut self, dt: f32) {
        let decay = (self.damping * dt).min(1.0);
        self.velocity.x -= self.velocity.x * decay;
        self.velocity.z -= self.velocity.z * decay;

        self.direction = Vec3::new(
            self.pressed.lateral_axis(),
            0.0,
            self.pressed.forward_axis(),
        )
        .normalize_or_zero();

        if self.pressed.any_forward() {
            self.velocity.z -= self.direction.z * self.step * dt;
        }
        if self.pressed.any_lateral() {
            self.velocity.x -= self.direction.x * self.step * dt;
        }

        self.camera.move_right(-self.velocity.x * dt);
        self.camera.move_forward(-self.velocity.z * dt);

        self.constraint
            .constrain(self.camera.position_mut(), &mut self.velocity);
    }

    /// Dispose the camera control and detach from `source`.
    pub fn destroy(mut self, source: &mut dyn InputSource) {
        self.camera.dispose();
        source.unsubscribe(self.subscription);
        tracing::debug!("controls destroyed");
    }
}
