//! Wave director: turns the wave table into timed spawns, waits for the
//! field to clear, and decides between the upgrade screen, the next wave, and
//! victory.
//!
//! ```text
//! Idle ─start_wave─▶ Spawning ─queue empty─▶ AwaitingClear
//!                        ▲                      │ clear debounce elapsed
//!                        └──── next wave ◀──────┤
//!                      Upgrading ◀── boundary ──┤
//!                      Complete  ◀── no more ───┘
//! ```

use std::collections::VecDeque;

use rand::Rng;

use crate::config::{EnemyCatalog, WaveDef, WorldConfig};
use crate::constants::*;
use crate::entities::{Enemy, Powerup};
use crate::hooks::{GameEvent, GameHooks};
use crate::timers::{Scheduler, TimerAction, TimerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    Idle,
    Spawning,
    AwaitingClear,
    Upgrading,
    Complete,
}

/// What to do once the field has stayed empty for the whole debounce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearDecision {
    OpenUpgrades,
    StartWave(usize),
    Victory,
}

#[derive(Clone, Debug)]
pub struct WaveDirector {
    pub phase: WavePhase,
    /// Index into the wave table of the wave in progress.
    pub current: Option<usize>,
    /// Enemy types still to spawn this wave, front first.
    pub queue: VecDeque<String>,
    pub spawn_ticks: u32,
    pub clear_timer: Option<TimerId>,
    /// Set when the upgrade screen opens; cleared only when a new wave starts
    /// from the clear decision.
    pub upgrade_shown: bool,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveDirector {
    pub fn new() -> Self {
        WaveDirector {
            phase: WavePhase::Idle,
            current: None,
            queue: VecDeque::new(),
            spawn_ticks: 0,
            clear_timer: None,
            upgrade_shown: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_spawning(&self) -> bool {
        self.phase == WavePhase::Spawning
    }

    /// 1-based number for display; 0 before the first wave.
    pub fn wave_number(&self) -> usize {
        self.current.map_or(0, |i| i + 1)
    }

    /// Load wave `index` into the spawn queue and drop a fresh powerup batch.
    /// Returns `false` and changes nothing when the index is past the table.
    pub fn start_wave(
        &mut self,
        index: usize,
        waves: &[WaveDef],
        powerups: &mut Vec<Powerup>,
        world: &WorldConfig,
        rng: &mut impl Rng,
        hooks: &mut impl GameHooks,
    ) -> bool {
        let Some(wave) = waves.get(index) else {
            return false;
        };
        self.current = Some(index);
        self.queue = wave
            .zombies
            .iter()
            .flat_map(|z| std::iter::repeat(z.kind.clone()).take(z.count as usize))
            .collect();
        self.spawn_ticks = 0;
        self.phase = WavePhase::Spawning;
        crate::powerups::spawn_batch(powerups, world, rng);

        tracing::info!(wave = index + 1, enemies = self.queue.len(), "wave started");
        hooks.notify(GameEvent::WaveStarted(index + 1));
        true
    }

    /// One frame of spawn cadence: every `WAVE_SPAWN_INTERVAL` frames the next
    /// queued type enters along the top edge.
    pub fn spawn_tick(
        &mut self,
        enemies: &mut Vec<Enemy>,
        catalog: &EnemyCatalog,
        world: &WorldConfig,
        now: u64,
        rng: &mut impl Rng,
    ) {
        if self.phase != WavePhase::Spawning {
            return;
        }
        self.spawn_ticks += 1;
        if self.spawn_ticks >= WAVE_SPAWN_INTERVAL {
            self.spawn_ticks = 0;
            if let Some(kind) = self.queue.pop_front() {
                match catalog.resolve(&kind) {
                    Some(data) => {
                        let size = data.size.unwrap_or(DEFAULT_ENEMY_SIZE);
                        let x = rng.gen::<f32>() * (world.width - size).max(0.0);
                        enemies.push(Enemy::from_data(&kind, data, x, 0.0, now));
                    }
                    None => tracing::warn!(kind = %kind, "no catalog entry; spawn skipped"),
                }
            }
        }
        if self.queue.is_empty() {
            self.phase = WavePhase::AwaitingClear;
        }
    }

    /// Arm the clear debounce when the field is empty; disarm it as soon as
    /// anything shows up again.
    pub fn check_clear(
        &mut self,
        enemy_count: usize,
        timers: &mut Scheduler,
        session: u64,
        now: u64,
    ) {
        if self.phase != WavePhase::AwaitingClear {
            return;
        }
        if enemy_count == 0 {
            if self.clear_timer.is_none() {
                let id = timers.schedule(now + WAVE_CLEAR_DEBOUNCE_MS, session, TimerAction::WaveClear);
                self.clear_timer = Some(id);
            }
        } else if let Some(id) = self.clear_timer.take() {
            timers.cancel(id);
        }
    }

    /// The debounce timer `id` fired. Returns the transition to perform, or
    /// `None` when the timer is no longer the armed one or the field refilled.
    pub fn on_clear_elapsed(
        &mut self,
        id: TimerId,
        enemy_count: usize,
        wave_count: usize,
    ) -> Option<ClearDecision> {
        if self.clear_timer != Some(id) {
            return None;
        }
        self.clear_timer = None;
        if self.phase != WavePhase::AwaitingClear || enemy_count > 0 {
            return None;
        }

        let upcoming = self.current.map_or(0, |i| i + 1);
        if upcoming % UPGRADE_WAVE_INTERVAL == 0 && !self.upgrade_shown {
            self.upgrade_shown = true;
            self.phase = WavePhase::Upgrading;
            Some(ClearDecision::OpenUpgrades)
        } else {
            Some(self.advance(upcoming, wave_count))
        }
    }

    /// The upgrade screen was due but nothing is left to raise: move on as if
    /// it had been shown and dismissed.
    pub fn skip_upgrades(&mut self, wave_count: usize) -> ClearDecision {
        self.phase = WavePhase::AwaitingClear;
        let upcoming = self.current.map_or(0, |i| i + 1);
        self.advance(upcoming, wave_count)
    }

    fn advance(&mut self, upcoming: usize, wave_count: usize) -> ClearDecision {
        if upcoming < wave_count {
            self.upgrade_shown = false;
            ClearDecision::StartWave(upcoming)
        } else {
            self.phase = WavePhase::Complete;
            ClearDecision::Victory
        }
    }

    /// Upgrade screen dismissed: go back to waiting, so the next clear check
    /// re-arms the debounce and this time advances.
    pub fn close_upgrades(&mut self) {
        if self.phase == WavePhase::Upgrading {
            self.phase = WavePhase::AwaitingClear;
        }
    }
}
