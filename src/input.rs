//! Device-independent input snapshot: whatever drives the game (keyboard,
//! mouse, joystick) boils down to these held flags plus one-shot calls on
//! `compute` for firing, reloading and pausing.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub sprint: bool,
}

impl InputState {
    pub fn is_moving(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// Unit direction of the held keys, `(0, 0)` when idle or cancelled out.
    pub fn direction(&self) -> (f32, f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.left {
            dx -= 1.0;
        }
        if self.right {
            dx += 1.0;
        }
        if self.up {
            dy -= 1.0;
        }
        if self.down {
            dy += 1.0;
        }
        let len = f32::hypot(dx, dy);
        if len == 0.0 {
            (0.0, 0.0)
        } else {
            (dx / len, dy / len)
        }
    }
}
