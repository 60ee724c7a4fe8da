//! Seams to the outside world: side-effect notifications, the game-end
//! callback, and the per-frame renderer. The core never reads anything back.

use crate::compute::GameState;
use crate::entities::{PowerupKind, UpgradeKind};

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Shoot,
    /// A bullet struck an enemy that survived or died.
    Hit,
    /// An enemy died.
    Explosion,
    ReloadStarted,
    ReloadFinished,
    Powerup(PowerupKind),
    PlayerHurt,
    ScoreChanged(u32),
    HealthChanged { health: i32, max: i32 },
    AmmoChanged { ammo: u32, reserve: u32 },
    /// 1-based wave number for display.
    WaveStarted(usize),
    UpgradeScreenOpened,
    Upgraded(UpgradeKind),
    UpgradeScreenClosed,
    Victory,
    Defeat,
}

pub trait GameHooks {
    fn notify(&mut self, event: GameEvent);

    /// Called once when a run ends. The core stays stopped afterwards.
    fn game_ended(&mut self, victory: bool);
}

/// Records every notification; the game-end callback is logged as
/// `Victory` or `Defeat`.
impl GameHooks for Vec<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        self.push(event);
    }

    fn game_ended(&mut self, victory: bool) {
        self.push(if victory { GameEvent::Victory } else { GameEvent::Defeat });
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl GameHooks for NoHooks {
    fn notify(&mut self, _event: GameEvent) {}

    fn game_ended(&mut self, _victory: bool) {}
}

pub trait Renderer {
    fn draw(&mut self, state: &GameState);
}

impl<F: FnMut(&GameState)> Renderer for F {
    fn draw(&mut self, state: &GameState) {
        self(state)
    }
}
