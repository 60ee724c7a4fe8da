//! Viewport placement.

use crate::config::WorldConfig;
use crate::entities::{Bounds, Player};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

impl Camera {
    /// Centre on the player, then clamp so the view never leaves the world.
    /// A world smaller than the view pins the camera at the origin.
    pub fn follow(&mut self, player: &Player, world: &WorldConfig) {
        let (cx, cy) = player.center();
        let x = (cx - world.view_width / 2.0).round();
        let y = (cy - world.view_height / 2.0).round();
        self.x = x.min(world.width - world.view_width).max(0.0);
        self.y = y.min(world.height - world.view_height).max(0.0);
    }

    pub fn to_view(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x, y - self.y)
    }

    pub fn to_world(&self, x: f32, y: f32) -> (f32, f32) {
        (x + self.x, y + self.y)
    }
}
