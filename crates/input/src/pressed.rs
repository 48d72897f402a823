//! Held-direction flags. Platform code flips them on key events, the
//! integrator reads them each frame.

use crate::bindings::MoveDirection;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressedKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PressedKeys {
    pub fn set(&mut self, direction: MoveDirection, pressed: bool) {
        match direction {
            MoveDirection::Up => self.up = pressed,
            MoveDirection::Down => self.down = pressed,
            MoveDirection::Left => self.left = pressed,
            MoveDirection::Right => self.right = pressed,
        }
    }

    pub fn is_held(&self, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Up => self.up,
            MoveDirection::Down => self.down,
            MoveDirection::Left => self.left,
            MoveDirection::Right => self.right,
        }
    }

    /// `up - down` as -1, 0 or 1.
    pub fn forward_axis(&self) -> f32 {
        f32::from(u8::from(self.up)) - f32::from(u8::from(self.down))
    }

    /// `right - left` as -1, 0 or 1.
    pub fn lateral_axis(&self) -> f32 {
        f32::from(u8::from(self.right)) - f32::from(u8::from(self.left))
    }

    pub fn any_forward(&self) -> bool {
        self.up || self.down
    }

    pub fn any_lateral(&self) -> bool {
        self.left || self.right
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_query() {
        let mut p = PressedKeys::default();
        p.set(MoveDirection::Left, true);
        assert!(p.is_held(MoveDirection::Left));
        assert!(p.any_lateral());
        assert!(!p.any_forward());
        assert_eq!(p.lateral_axis(), -1.0);
        p.set(MoveDirection::Left, false);
        assert_eq!(p, PressedKeys::default());
    }

    #[test]
    fn opposing_keys_cancel() {
        let p = PressedKeys {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(p.forward_axis(), 0.0);
        assert_eq!(p.lateral_axis(), 0.0);
        assert!(p.any_forward() && p.any_lateral());
    }

    #[test]
    fn clear_releases_everything() {
        let mut p = PressedKeys {
            up: true,
            right: true,
            ..Default::default()
        };
        p.clear();
        assert_eq!(p.forward_axis(), 0.0);
        assert!(!p.any_lateral());
    }
}
