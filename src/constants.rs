//! Gameplay tuning. Distances are world units, durations are clock
//! milliseconds, and rates are per frame unless noted.

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: f32 = 24.0;
pub const PLAYER_BASE_SPEED: f32 = 6.0;
pub const PLAYER_BASE_SPRINT_SPEED: f32 = 10.0;
pub const PLAYER_BASE_MAX_HEALTH: i32 = 10;
pub const PLAYER_BASE_MAGAZINE: u32 = 16;
pub const PLAYER_START_RESERVE: u32 = 1500;
pub const PLAYER_MAX_STAMINA: f32 = 100.0;

/// Enemy contact can cost health at most once per this window.
pub const PLAYER_HIT_COOLDOWN_MS: u64 = 1000;

// ── Stamina ───────────────────────────────────────────────────────────────────

pub const SPRINT_DRAIN: f32 = 0.5;
pub const STAMINA_REGEN_MOVING: f32 = 0.15;
pub const STAMINA_REGEN_IDLE: f32 = 0.25;

// ── Weapon ────────────────────────────────────────────────────────────────────

pub const BULLET_SPEED: f32 = 7.0;
pub const BULLET_SIZE: f32 = 8.0;
pub const BASE_BULLET_DAMAGE: u32 = 1;
pub const RELOAD_MS: u64 = 3000;
/// Bullets further than this from the player centre are dropped.
pub const BULLET_CULL_DISTANCE: f32 = 1500.0;
/// Angular offset (radians) of the outer triple-shot pellets.
pub const TRIPLE_SHOT_SPREAD: f32 = 0.2;
pub const TRIPLE_SHOT_PELLETS: u32 = 3;

// ── Upgrades ──────────────────────────────────────────────────────────────────

pub const MAX_UPGRADE_LEVEL: u8 = 5;
pub const UPGRADE_PICKS: u8 = 3;
pub const HEALTH_PER_LEVEL: i32 = 2;
pub const SPEED_PER_LEVEL: f32 = 0.25;
pub const MAGAZINE_PER_LEVEL: u32 = 4;
pub const KNOCKBACK_PER_LEVEL: f32 = 0.2;
/// Interstitial opens before every wave whose index is a multiple of this.
pub const UPGRADE_WAVE_INTERVAL: usize = 3;

// ── Combat ────────────────────────────────────────────────────────────────────

pub const BASE_KNOCKBACK: f32 = 8.0;
pub const HIT_FLASH_FRAMES: u8 = 6;
pub const DEFAULT_ENEMY_SCORE: u32 = 10;
pub const DEFAULT_ENEMY_SIZE: f32 = 40.0;

// ── Enemy abilities ───────────────────────────────────────────────────────────

pub const SUMMON_INTERVAL_MS: u64 = 5000;
pub const SUMMON_COUNT: usize = 2;
pub const SUMMON_RING_MIN: f32 = 60.0;
pub const SUMMON_RING_SPAN: f32 = 20.0;
pub const MINION_TYPE: &str = "minion";
pub const MINION_FALLBACK_SIZE: f32 = 24.0;
pub const MINION_FALLBACK_SPEED: f32 = 3.0;
pub const MINION_FALLBACK_HEALTH: i32 = 1;

pub const JUGGERNAUT_FALLBACK_SPEED: f32 = 0.3;
pub const JUGGERNAUT_CHARGE_MULTIPLIER: f32 = 7.5;
pub const JUGGERNAUT_CHARGE_DISTANCE: f32 = 300.0;

pub const THROW_INTERVAL_MS: u64 = 3000;
pub const THROW_SPEED: f32 = 6.0;
pub const THROW_WIDTH: f32 = 18.0;
pub const THROW_HEIGHT: f32 = 10.0;
/// Projectiles this far outside the world are dropped.
pub const PROJECTILE_MARGIN: f32 = 50.0;

pub const SPLIT_TYPE: &str = "Spitter1";
pub const SPLIT_COUNT: usize = 2;
pub const SPLIT_RING_MIN: f32 = 20.0;
pub const SPLIT_RING_SPAN: f32 = 10.0;
pub const SPLIT_FALLBACK_SIZE: f32 = 35.0;

// ── Waves ─────────────────────────────────────────────────────────────────────

/// Frames between two queued spawns.
pub const WAVE_SPAWN_INTERVAL: u32 = 40;
pub const WAVE_CLEAR_DEBOUNCE_MS: u64 = 1200;

// ── Powerups ──────────────────────────────────────────────────────────────────

pub const POWERUP_SIZE: f32 = 24.0;
pub const POWERUP_EDGE_MARGIN: f32 = 30.0;
pub const POWERUP_BATCH_MIN: usize = 2;
pub const POWERUP_BATCH_MAX: usize = 3;
pub const AMMO_PICKUP_ROUNDS: u32 = 42;
pub const HEALTH_PICKUP: i32 = 1;
pub const DOUBLE_DAMAGE_MS: u64 = 10_000;
pub const IMMUNITY_MS: u64 = 5_000;
pub const TRIPLE_SHOT_MS: u64 = 10_000;
