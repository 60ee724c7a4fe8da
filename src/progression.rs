//! Player progression and resources: upgrade levels and the stats derived
//! from them, firing and the ammo economy, reloading, stamina and movement.

use crate::config::WorldConfig;
use crate::constants::*;
use crate::entities::{Bounds, Bullet, Player, UpgradeKind};
use crate::hooks::{GameEvent, GameHooks};
use crate::input::InputState;
use crate::timers::{Scheduler, TimerAction};

// ── Upgrades ──────────────────────────────────────────────────────────────────

/// Raise one upgrade level and apply its immediate effect. Returns `false`
/// (and changes nothing) when the category is already at the cap.
pub fn apply_upgrade(player: &mut Player, kind: UpgradeKind) -> bool {
    let level = player.upgrades.get_mut(kind);
    if *level >= MAX_UPGRADE_LEVEL {
        return false;
    }
    *level += 1;
    recalc_stats(player);

    match kind {
        UpgradeKind::Health => {
            player.health = (player.health + HEALTH_PER_LEVEL).min(player.max_health);
        }
        UpgradeKind::Magazine => {
            player.ammo = (player.ammo + MAGAZINE_PER_LEVEL).min(player.magazine_size);
        }
        // Speed is already live through recalc; damage and knockback are read at use.
        UpgradeKind::Speed | UpgradeKind::Damage | UpgradeKind::Knockback => {}
    }
    true
}

/// Derive max health, speeds and magazine size from base values and levels,
/// then clamp current health and ammo into the new bounds. Idempotent.
pub fn recalc_stats(player: &mut Player) {
    let lv = player.upgrades;
    player.max_health = player.base_max_health + i32::from(lv.health) * HEALTH_PER_LEVEL;
    player.normal_speed = player.base_speed + f32::from(lv.speed) * SPEED_PER_LEVEL;
    player.sprint_speed = player.base_sprint_speed + f32::from(lv.speed) * SPEED_PER_LEVEL;
    player.magazine_size = player.base_magazine + u32::from(lv.magazine) * MAGAZINE_PER_LEVEL;

    player.health = player.health.clamp(0, player.max_health);
    player.ammo = player.ammo.min(player.magazine_size);
    player.speed = if player.sprinting { player.sprint_speed } else { player.normal_speed };
}

/// Damage a bullet fired right now would carry.
pub fn bullet_damage(player: &Player) -> u32 {
    let base = BASE_BULLET_DAMAGE + u32::from(player.upgrades.damage);
    if player.double_damage {
        base * 2
    } else {
        base
    }
}

pub fn knockback_multiplier(player: &Player) -> f32 {
    1.0 + f32::from(player.upgrades.knockback) * KNOCKBACK_PER_LEVEL
}

// ── Firing ────────────────────────────────────────────────────────────────────

/// Fire toward a world-space target. Returns the number of rounds spent;
/// zero means the trigger pull was rejected (empty magazine or reloading).
pub fn fire(
    player: &mut Player,
    bullets: &mut Vec<Bullet>,
    target: (f32, f32),
    hooks: &mut impl GameHooks,
) -> u32 {
    if player.ammo == 0 || player.is_reloading {
        return 0;
    }

    let (cx, cy) = player.center();
    let aim = (target.1 - cy).atan2(target.0 - cx);
    let damage = bullet_damage(player);
    let pellets = if player.triple_shot { TRIPLE_SHOT_PELLETS.min(player.ammo) } else { 1 };
    let offsets = [0.0, -TRIPLE_SHOT_SPREAD, TRIPLE_SHOT_SPREAD];

    for offset in offsets.iter().take(pellets as usize) {
        let angle = aim + offset;
        bullets.push(Bullet {
            x: cx - BULLET_SIZE / 2.0,
            y: cy - BULLET_SIZE / 2.0,
            dx: angle.cos() * BULLET_SPEED,
            dy: angle.sin() * BULLET_SPEED,
            width: BULLET_SIZE,
            height: BULLET_SIZE,
            damage,
            double: player.double_damage,
        });
    }
    player.ammo -= pellets;

    hooks.notify(GameEvent::Shoot);
    hooks.notify(GameEvent::AmmoChanged { ammo: player.ammo, reserve: player.reserve_ammo });
    pellets
}

// ── Reload ────────────────────────────────────────────────────────────────────

/// Manual reload guard: room in the magazine, rounds in reserve, not busy.
pub fn can_reload(player: &Player) -> bool {
    !player.is_reloading && player.ammo < player.magazine_size && player.reserve_ammo > 0
}

/// Begin a reload if allowed; completion is scheduled `RELOAD_MS` later.
pub fn start_reload(
    player: &mut Player,
    timers: &mut Scheduler,
    session: u64,
    now: u64,
    hooks: &mut impl GameHooks,
) -> bool {
    if !can_reload(player) {
        return false;
    }
    player.is_reloading = true;
    timers.schedule(now + RELOAD_MS, session, TimerAction::ReloadComplete);
    tracing::debug!(ammo = player.ammo, reserve = player.reserve_ammo, "reload started");
    hooks.notify(GameEvent::ReloadStarted);
    true
}

/// Reload automatically once the magazine is exactly empty.
pub fn auto_reload(
    player: &mut Player,
    timers: &mut Scheduler,
    session: u64,
    now: u64,
    hooks: &mut impl GameHooks,
) -> bool {
    if player.ammo != 0 {
        return false;
    }
    start_reload(player, timers, session, now, hooks)
}

pub fn finish_reload(player: &mut Player, hooks: &mut impl GameHooks) {
    let needed = player.magazine_size.saturating_sub(player.ammo);
    let loaded = needed.min(player.reserve_ammo);
    player.ammo += loaded;
    player.reserve_ammo -= loaded;
    player.is_reloading = false;
    tracing::debug!(loaded, reserve = player.reserve_ammo, "reload finished");
    hooks.notify(GameEvent::ReloadFinished);
    hooks.notify(GameEvent::AmmoChanged { ammo: player.ammo, reserve: player.reserve_ammo });
}

// ── Stamina & movement ────────────────────────────────────────────────────────

/// Sprint/stamina transition for one frame. `input.sprint` is the held sprint
/// key; sprinting is forced off whenever stamina sits at exactly zero.
pub fn update_stamina(player: &mut Player, input: &InputState) {
    player.sprinting = input.sprint;
    if player.sprinting && player.stamina > 0.0 {
        player.speed = player.sprint_speed;
        player.stamina = (player.stamina - SPRINT_DRAIN).max(0.0);
    } else {
        player.speed = player.normal_speed;
        let regen = if input.is_moving() { STAMINA_REGEN_MOVING } else { STAMINA_REGEN_IDLE };
        player.stamina = (player.stamina + regen).min(player.max_stamina);
    }
    if player.stamina == 0.0 {
        player.sprinting = false;
    }
}

/// Step along the held direction at the live speed, clamped to the world.
pub fn move_player(player: &mut Player, input: &InputState, world: &WorldConfig) {
    let (dx, dy) = input.direction();
    player.x += dx * player.speed;
    player.y += dy * player.speed;
    player.x = player.x.min(world.width - player.width).max(0.0);
    player.y = player.y.min(world.height - player.height).max(0.0);
}

/// Back to a fresh run: base stats, no upgrades, no buffs, full resources.
pub fn reset_player(player: &mut Player, world: &WorldConfig) {
    player.upgrades = Default::default();
    player.effects.clear();
    player.immune = false;
    player.double_damage = false;
    player.triple_shot = false;
    player.sprinting = false;
    player.is_reloading = false;
    player.last_hit_at = None;
    recalc_stats(player);
    player.health = player.max_health;
    player.ammo = player.magazine_size;
    player.reserve_ammo = PLAYER_START_RESERVE;
    player.stamina = player.max_stamina;
    player.place_at_start(world);
}
