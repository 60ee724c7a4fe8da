//! Simulation entities: pure data plus the store that owns the live
//! collections. Behaviour lives in the systems modules.

use crate::config::{EnemyTypeData, WorldConfig};
use crate::constants::*;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Anything with an axis-aligned bounding box in world units.
pub trait Bounds {
    fn rect(&self) -> Rect;

    fn center(&self) -> (f32, f32) {
        let r = self.rect();
        (r.x + r.w / 2.0, r.y + r.h / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// The five upgrade categories offered on the upgrade screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    Damage,
    Health,
    Speed,
    Magazine,
    Knockback,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Damage,
        UpgradeKind::Health,
        UpgradeKind::Speed,
        UpgradeKind::Magazine,
        UpgradeKind::Knockback,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Damage",
            UpgradeKind::Health => "Health",
            UpgradeKind::Speed => "Speed",
            UpgradeKind::Magazine => "Magazine",
            UpgradeKind::Knockback => "Knockback",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpgradeLevels {
    pub damage: u8,
    pub health: u8,
    pub speed: u8,
    pub magazine: u8,
    pub knockback: u8,
}

impl UpgradeLevels {
    pub fn get(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::Damage => self.damage,
            UpgradeKind::Health => self.health,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::Magazine => self.magazine,
            UpgradeKind::Knockback => self.knockback,
        }
    }

    /// Levels still available across every category.
    pub fn remaining(&self) -> u8 {
        UpgradeKind::ALL
            .iter()
            .map(|&kind| MAX_UPGRADE_LEVEL.saturating_sub(self.get(kind)))
            .sum()
    }

    pub fn get_mut(&mut self, kind: UpgradeKind) -> &mut u8 {
        match kind {
            UpgradeKind::Damage => &mut self.damage,
            UpgradeKind::Health => &mut self.health,
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::Magazine => &mut self.magazine,
            UpgradeKind::Knockback => &mut self.knockback,
        }
    }
}

/// Temporary player buffs granted by powerups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    DoubleDamage,
    Immunity,
    TripleShot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    /// Clock time (ms) at which the effect lapses.
    pub expires_at: u64,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    /// Live movement speed: either `normal_speed` or `sprint_speed`.
    pub speed: f32,
    pub normal_speed: f32,
    pub sprint_speed: f32,
    pub base_speed: f32,
    pub base_sprint_speed: f32,

    pub health: i32,
    pub max_health: i32,
    pub base_max_health: i32,

    pub ammo: u32,
    pub magazine_size: u32,
    pub base_magazine: u32,
    pub reserve_ammo: u32,
    pub is_reloading: bool,

    pub stamina: f32,
    pub max_stamina: f32,
    pub sprinting: bool,

    pub immune: bool,
    pub double_damage: bool,
    pub triple_shot: bool,
    pub effects: Vec<ActiveEffect>,

    /// Clock time of the last enemy contact that cost health.
    pub last_hit_at: Option<u64>,
    pub upgrades: UpgradeLevels,
}

impl Player {
    /// A fresh player standing near the bottom centre of the world.
    pub fn new(world: &WorldConfig) -> Self {
        let mut player = Player {
            x: 0.0,
            y: 0.0,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_BASE_SPEED,
            normal_speed: PLAYER_BASE_SPEED,
            sprint_speed: PLAYER_BASE_SPRINT_SPEED,
            base_speed: PLAYER_BASE_SPEED,
            base_sprint_speed: PLAYER_BASE_SPRINT_SPEED,
            health: PLAYER_BASE_MAX_HEALTH,
            max_health: PLAYER_BASE_MAX_HEALTH,
            base_max_health: PLAYER_BASE_MAX_HEALTH,
            ammo: PLAYER_BASE_MAGAZINE,
            magazine_size: PLAYER_BASE_MAGAZINE,
            base_magazine: PLAYER_BASE_MAGAZINE,
            reserve_ammo: PLAYER_START_RESERVE,
            is_reloading: false,
            stamina: PLAYER_MAX_STAMINA,
            max_stamina: PLAYER_MAX_STAMINA,
            sprinting: false,
            immune: false,
            double_damage: false,
            triple_shot: false,
            effects: Vec::new(),
            last_hit_at: None,
            upgrades: UpgradeLevels::default(),
        };
        player.place_at_start(world);
        player
    }

    pub fn place_at_start(&mut self, world: &WorldConfig) {
        self.x = world.width / 2.0 - self.width / 2.0;
        self.y = (world.height - self.height - 20.0).max(0.0);
    }
}

impl Bounds for Player {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Special behaviour attached to an enemy type name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyRole {
    Plain,
    Summoner,
    Juggernaut,
    Thrower,
    Spitter,
}

impl EnemyRole {
    /// Exact, case-sensitive match on the catalog key.
    pub fn for_type(kind: &str) -> Self {
        match kind {
            "summoner" => EnemyRole::Summoner,
            "Juggernaut" => EnemyRole::Juggernaut,
            "thrower" => EnemyRole::Thrower,
            "Spitter" => EnemyRole::Spitter,
            _ => EnemyRole::Plain,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Catalog speed; the juggernaut charge is computed from it every frame.
    pub base_speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub kind: String,
    pub role: EnemyRole,
    pub color: String,
    pub score: u32,
    /// Frames of hit-flash left to draw.
    pub hit_flash: u8,
    /// 0.0 takes full knockback, 1.0 ignores it.
    pub knockback_resistance: f32,
    /// Clock time of spawn or of the last summon/throw.
    pub last_ability_at: u64,
}

impl Enemy {
    /// Build an enemy from its catalog entry with its top-left corner at `(x, y)`.
    pub fn from_data(kind: &str, data: &EnemyTypeData, x: f32, y: f32, now: u64) -> Self {
        let size = data.size.unwrap_or(DEFAULT_ENEMY_SIZE);
        Enemy {
            x,
            y,
            width: size,
            height: size,
            speed: data.speed,
            base_speed: data.speed,
            health: data.health,
            max_health: data.health,
            kind: kind.to_string(),
            role: EnemyRole::for_type(kind),
            color: data.color.clone().unwrap_or_else(|| "red".to_string()),
            score: data.score.unwrap_or(DEFAULT_ENEMY_SCORE),
            hit_flash: 0,
            knockback_resistance: data.knockback_resistance.unwrap_or(0.0).clamp(0.0, 1.0),
            last_ability_at: now,
        }
    }
}

impl Bounds for Enemy {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Player-fired round. Damage is fixed when the shot leaves the barrel.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: f32,
    pub height: f32,
    pub damage: u32,
    /// Fired under double damage; drawn in a different colour.
    pub double: bool,
}

impl Bounds for Bullet {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

/// Enemy-fired missile. Always costs the player one health.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: f32,
    pub height: f32,
    pub source: String,
}

impl Bounds for Projectile {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

// ── Powerups ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerupKind {
    Ammo,
    Health,
    DoubleDamage,
    Immunity,
    TripleShot,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Ammo,
        PowerupKind::Health,
        PowerupKind::DoubleDamage,
        PowerupKind::Immunity,
        PowerupKind::TripleShot,
    ];

    pub fn color(self) -> &'static str {
        match self {
            PowerupKind::Ammo => "blue",
            PowerupKind::Health => "green",
            PowerupKind::DoubleDamage => "yellow",
            PowerupKind::Immunity => "white",
            PowerupKind::TripleShot => "orange",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PowerupKind,
}

impl Bounds for Powerup {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

// ── Entity store ──────────────────────────────────────────────────────────────

/// Owner of every live entity collection. Entities are appended on creation
/// and removed by index while iterating in reverse.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<Powerup>,
}

impl EntityStore {
    /// Empty every collection. Ability timers live on the enemies, so they go too.
    pub fn reset_all(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
        self.projectiles.clear();
        self.powerups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
            && self.bullets.is_empty()
            && self.projectiles.is_empty()
            && self.powerups.is_empty()
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Built but never started.
    Ready,
    Playing,
    /// Upgrade screen open; `picks_left` choices remain.
    Upgrading { picks_left: u8 },
    Over { victory: bool },
}
