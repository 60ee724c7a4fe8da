//! Frame orchestration.
//!
//! `GameState` aggregates everything one run mutates. The host owns it and
//! drives it through the functions below; randomness, time, side effects and
//! drawing are all injected so a test can run a whole game headless.
//!
//! Every function here edits the state in place through `&mut GameState`
//! instead of returning a fresh copy. Pending timers, the wave director and
//! per-enemy ability clocks all live inside the state and must carry over
//! from one call to the next unchanged, so a single owned value is threaded
//! through the whole run.

use rand::Rng;

use crate::ai;
use crate::camera::Camera;
use crate::clock::Clock;
use crate::combat;
use crate::config::{EnemyCatalog, WaveDef, WorldConfig};
use crate::constants::*;
use crate::entities::{Bounds, EntityStore, GameStatus, Player, UpgradeKind};
use crate::hooks::{GameEvent, GameHooks, Renderer};
use crate::input::InputState;
use crate::powerups;
use crate::progression;
use crate::timers::{Scheduler, TimerAction};
use crate::waves::{ClearDecision, WaveDirector};

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub store: EntityStore,
    pub waves: WaveDirector,
    pub camera: Camera,
    pub timers: Scheduler,
    pub catalog: EnemyCatalog,
    pub wave_table: Vec<WaveDef>,
    pub world: WorldConfig,
    pub score: u32,
    pub status: GameStatus,
    /// False before the first start and after the run ends.
    pub running: bool,
    /// Set by the pause menu and by the upgrade screen.
    pub paused: bool,
    pub frame: u64,
    /// Bumped on every reset; timers from an older session are ignored.
    pub session: u64,
}

impl GameState {
    pub fn new(catalog: EnemyCatalog, wave_table: Vec<WaveDef>, world: WorldConfig) -> Self {
        init_state(catalog, wave_table, world)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over { .. })
    }

    pub fn upgrade_picks_left(&self) -> Option<u8> {
        match self.status {
            GameStatus::Upgrading { picks_left } => Some(picks_left),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame ran to completion and the next one should follow.
    Advanced,
    /// Not running or paused: nothing happened, nothing was drawn.
    Suspended,
    /// The player died this frame; the rest of the frame was skipped.
    Ended,
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Build an idle game around the given data. Call `start_game` to play.
pub fn init_state(catalog: EnemyCatalog, wave_table: Vec<WaveDef>, world: WorldConfig) -> GameState {
    let player = Player::new(&world);
    let mut camera = Camera::default();
    camera.follow(&player, &world);
    GameState {
        player,
        store: EntityStore::default(),
        waves: WaveDirector::new(),
        camera,
        timers: Scheduler::new(),
        catalog,
        wave_table,
        world,
        score: 0,
        status: GameStatus::Ready,
        running: false,
        paused: false,
        frame: 0,
        session: 0,
    }
}

/// Wipe the run: entities, timers, waves, score and player all return to
/// their starting values, and a new session begins.
pub fn reset_game(state: &mut GameState) {
    state.session += 1;
    state.store.reset_all();
    state.timers.clear();
    state.waves.reset();
    progression::reset_player(&mut state.player, &state.world);
    state.camera.follow(&state.player, &state.world);
    state.score = 0;
    state.frame = 0;
    state.status = GameStatus::Ready;
    state.running = false;
    state.paused = false;
}

/// Reset and begin the first wave.
pub fn start_game(state: &mut GameState, rng: &mut impl Rng, hooks: &mut impl GameHooks) {
    reset_game(state);
    state.running = true;
    state.status = GameStatus::Playing;
    tracing::info!(session = state.session, waves = state.wave_table.len(), "game started");

    let p = &state.player;
    hooks.notify(GameEvent::ScoreChanged(0));
    hooks.notify(GameEvent::HealthChanged { health: p.health, max: p.max_health });
    hooks.notify(GameEvent::AmmoChanged { ammo: p.ammo, reserve: p.reserve_ammo });

    let started = state.waves.start_wave(
        0,
        &state.wave_table,
        &mut state.store.powerups,
        &state.world,
        rng,
        hooks,
    );
    if !started {
        end_game(state, true, hooks);
    }
}

fn end_game(state: &mut GameState, victory: bool, hooks: &mut impl GameHooks) {
    state.running = false;
    state.status = GameStatus::Over { victory };
    state.timers.clear();
    tracing::info!(victory, score = state.score, wave = state.waves.wave_number(), "game over");
    hooks.game_ended(victory);
}

pub fn pause_game(state: &mut GameState) -> bool {
    if !state.running || state.paused {
        return false;
    }
    state.paused = true;
    true
}

/// Leave the pause menu. The upgrade screen can only be left by picking.
pub fn resume_game(state: &mut GameState) -> bool {
    if !state.paused || state.upgrade_picks_left().is_some() {
        return false;
    }
    state.paused = false;
    true
}

// ── Player actions ────────────────────────────────────────────────────────────

/// Pull the trigger toward a world-space point. Returns rounds spent.
pub fn fire_at(state: &mut GameState, target: (f32, f32), hooks: &mut impl GameHooks) -> u32 {
    if !state.running || state.paused {
        return 0;
    }
    progression::fire(&mut state.player, &mut state.store.bullets, target, hooks)
}

pub fn request_reload(state: &mut GameState, clock: &impl Clock, hooks: &mut impl GameHooks) -> bool {
    if !state.running {
        return false;
    }
    progression::start_reload(
        &mut state.player,
        &mut state.timers,
        state.session,
        clock.now_ms(),
        hooks,
    )
}

/// Spend one upgrade-screen pick. Capped categories are refused without
/// using the pick. The last pick closes the screen and unpauses, and so does
/// any pick that leaves nothing else to raise.
pub fn choose_upgrade(state: &mut GameState, kind: UpgradeKind, hooks: &mut impl GameHooks) -> bool {
    let Some(picks_left) = state.upgrade_picks_left() else {
        return false;
    };
    if !progression::apply_upgrade(&mut state.player, kind) {
        return false;
    }
    let p = &state.player;
    hooks.notify(GameEvent::Upgraded(kind));
    hooks.notify(GameEvent::HealthChanged { health: p.health, max: p.max_health });
    hooks.notify(GameEvent::AmmoChanged { ammo: p.ammo, reserve: p.reserve_ammo });

    let picks_left = (picks_left - 1).min(state.player.upgrades.remaining());
    if picks_left > 0 {
        state.status = GameStatus::Upgrading { picks_left };
    } else {
        state.status = GameStatus::Playing;
        state.paused = false;
        state.waves.close_upgrades();
        tracing::info!(upgrades = ?state.player.upgrades, "upgrade screen closed");
        hooks.notify(GameEvent::UpgradeScreenClosed);
    }
    true
}

// ── Timers ────────────────────────────────────────────────────────────────────

/// Run every scheduled action that has come due. Called by the host each loop
/// iteration whether or not the frame itself is paused.
pub fn fire_due_timers(
    state: &mut GameState,
    clock: &impl Clock,
    rng: &mut impl Rng,
    hooks: &mut impl GameHooks,
) {
    let now = clock.now_ms();
    for due in state.timers.take_due(now) {
        if due.session != state.session || !state.running {
            tracing::debug!(?due, session = state.session, "stale timer ignored");
            continue;
        }
        match due.action {
            TimerAction::ReloadComplete => progression::finish_reload(&mut state.player, hooks),
            TimerAction::WaveClear => {
                let decision = state.waves.on_clear_elapsed(
                    due.id,
                    state.store.enemies.len(),
                    state.wave_table.len(),
                );
                if let Some(decision) = decision {
                    apply_clear_decision(state, decision, rng, hooks);
                }
            }
        }
    }
}

fn apply_clear_decision(
    state: &mut GameState,
    decision: ClearDecision,
    rng: &mut impl Rng,
    hooks: &mut impl GameHooks,
) {
    match decision {
        ClearDecision::OpenUpgrades => {
            let picks_left = UPGRADE_PICKS.min(state.player.upgrades.remaining());
            if picks_left == 0 {
                tracing::info!(after_wave = state.waves.wave_number(), "all upgrades maxed; screen skipped");
                let next = state.waves.skip_upgrades(state.wave_table.len());
                apply_clear_decision(state, next, rng, hooks);
                return;
            }
            state.status = GameStatus::Upgrading { picks_left };
            state.paused = true;
            tracing::info!(after_wave = state.waves.wave_number(), "upgrade screen opened");
            hooks.notify(GameEvent::UpgradeScreenOpened);
        }
        ClearDecision::StartWave(index) => {
            state.waves.start_wave(
                index,
                &state.wave_table,
                &mut state.store.powerups,
                &state.world,
                rng,
                hooks,
            );
        }
        ClearDecision::Victory => end_game(state, true, hooks),
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the simulation by one frame. A no-op unless running and unpaused.
/// A lethal hit ends the run on the spot: nothing is drawn and no further
/// state advances that frame.
pub fn tick(
    state: &mut GameState,
    input: &InputState,
    clock: &impl Clock,
    hooks: &mut impl GameHooks,
    renderer: &mut impl Renderer,
    rng: &mut impl Rng,
) -> FrameOutcome {
    if !state.running || state.paused {
        return FrameOutcome::Suspended;
    }
    let now = clock.now_ms();
    state.frame += 1;
    powerups::refresh_effects(&mut state.player, now);

    // ── 1. Sprint & stamina ──────────────────────────────────────────────────
    progression::update_stamina(&mut state.player, input);

    // ── 2. Player movement ───────────────────────────────────────────────────
    progression::move_player(&mut state.player, input, &state.world);

    // ── 3. Bullets & projectiles ─────────────────────────────────────────────
    advance_shots(state);

    // ── 4. Camera ────────────────────────────────────────────────────────────
    state.camera.follow(&state.player, &state.world);

    // ── 5. Enemy AI ──────────────────────────────────────────────────────────
    ai::update_enemies(
        &mut state.store.enemies,
        &mut state.store.projectiles,
        &state.player,
        &state.catalog,
        now,
        rng,
    );

    // ── 6. Wave spawns ───────────────────────────────────────────────────────
    state.waves.spawn_tick(&mut state.store.enemies, &state.catalog, &state.world, now, rng);

    // ── 7. Combat ────────────────────────────────────────────────────────────
    let gained = combat::resolve_bullets_vs_enemies(
        &mut state.store.enemies,
        &mut state.store.bullets,
        progression::knockback_multiplier(&state.player),
        &state.catalog,
        now,
        rng,
        hooks,
    );
    if gained > 0 {
        state.score += gained;
        hooks.notify(GameEvent::ScoreChanged(state.score));
    }
    let dead = combat::resolve_enemies_vs_player(&state.store.enemies, &mut state.player, now, hooks)
        || combat::resolve_projectiles_vs_player(&mut state.store.projectiles, &mut state.player, hooks);
    if dead {
        end_game(state, false, hooks);
        return FrameOutcome::Ended;
    }
    combat::collect_powerups(&mut state.store.powerups, &mut state.player, now, hooks);

    // ── 8. Draw ──────────────────────────────────────────────────────────────
    renderer.draw(state);

    // ── 9. Wave clearance & auto-reload ──────────────────────────────────────
    state.waves.check_clear(state.store.enemies.len(), &mut state.timers, state.session, now);
    progression::auto_reload(&mut state.player, &mut state.timers, state.session, now, hooks);

    // ── 10. Next frame ───────────────────────────────────────────────────────
    FrameOutcome::Advanced
}

/// Move shots by their velocity and drop the ones that left play: bullets by
/// distance from the player, projectiles by the world edge plus a margin.
fn advance_shots(state: &mut GameState) {
    let (px, py) = state.player.center();
    state.store.bullets.retain_mut(|b| {
        b.x += b.dx;
        b.y += b.dy;
        let (bx, by) = b.center();
        f32::hypot(bx - px, by - py) <= BULLET_CULL_DISTANCE
    });

    let world = state.world;
    state.store.projectiles.retain_mut(|p| {
        p.x += p.dx;
        p.y += p.dy;
        p.x >= -PROJECTILE_MARGIN
            && p.x <= world.width + PROJECTILE_MARGIN
            && p.y >= -PROJECTILE_MARGIN
            && p.y <= world.height + PROJECTILE_MARGIN
    });
}
