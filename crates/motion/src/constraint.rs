use glam::Vec3;
use roadfly_common::Aabb;
use std::cell::Cell;
use std::rc::Rc;

/// Runs after the camera has moved each frame and may override the new
/// position and velocity in place.
pub trait MovementConstraint {
    fn constrain(&mut self, position: &mut Vec3, velocity: &mut Vec3);
}

impl<F> MovementConstraint for F
where
    F: FnMut(&mut Vec3, &mut Vec3),
{
    fn constrain(&mut self, position: &mut Vec3, velocity: &mut Vec3) {
        self(position, velocity)
    }
}

#[derive(Debug, Default)]
pub struct Unconstrained;

impl MovementConstraint for Unconstrained {
    fn constrain(&mut self, _position: &mut Vec3, _velocity: &mut Vec3) {}
}

/// Bounds filled in once the road has loaded; empty until then.
pub type SharedBounds = Rc<Cell<Option<Aabb>>>;

/// Keeps the camera inside the road's bounding box on X and Z.
#[derive(Debug, Clone, Default)]
pub struct BoundaryConstraint {
    bounds: SharedBounds,
}

impl BoundaryConstraint {
    pub fn new(bounds: SharedBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds.get()
    }
}

impl MovementConstraint for BoundaryConstraint {
    fn constrain(&mut self, position: &mut Vec3, velocity: &mut Vec3) {
        if let Some(bounds) = self.bounds.get() {
            clamp_to_bounds(&bounds, position, velocity);
        }
    }
}

/// Clamp X and Z of `position` into `bounds`, zeroing the matching velocity
/// component on every clamp. Returns whether anything was clamped.
pub fn clamp_to_bounds(bounds: &Aabb, position: &mut Vec3, velocity: &mut Vec3) -> bool {
    let mut clamped = false;

    if position.z < bounds.min.z {
        velocity.z = 0.0;
        position.z = bounds.min.z;
        clamped = true;
    } else if position.z > bounds.max.z {
        velocity.z = 0.0;
        position.z = bounds.max.z;
        clamped = true;
    }

    if position.x < bounds.min.x {
        velocity.x = 0.0;
        position.x = bounds.min.x;
        clamped = true;
    } else if position.x > bounds.max.x {
        velocity.x = 0.0;
        position.x = bounds.max.x;
        clamped = true;
    }

    clamped
}
