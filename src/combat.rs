//! Collision detection and its consequences: damage, knockback, score,
//! removal, and powerup pickup.
//!
//! Overlap is a strict AABB test on current positions. There is no swept
//! test, so a fast bullet can pass through a thin enemy between frames.

use rand::Rng;

use crate::ai;
use crate::config::EnemyCatalog;
use crate::constants::*;
use crate::entities::{Bounds, Bullet, Enemy, Player, Powerup, Projectile};
use crate::hooks::{GameEvent, GameHooks};

pub fn overlaps(a: &impl Bounds, b: &impl Bounds) -> bool {
    let a = a.rect();
    let b = b.rect();
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

// ── Bullets ↔ enemies ─────────────────────────────────────────────────────────

/// Resolve player bullets against enemies. Each bullet damages at most one
/// enemy: the first overlap found walking both lists from the back. Returns
/// the score earned from kills.
pub fn resolve_bullets_vs_enemies(
    enemies: &mut Vec<Enemy>,
    bullets: &mut Vec<Bullet>,
    knockback_multiplier: f32,
    catalog: &EnemyCatalog,
    now: u64,
    rng: &mut impl Rng,
    hooks: &mut impl GameHooks,
) -> u32 {
    let mut gained = 0;

    for i in (0..enemies.len()).rev() {
        for j in (0..bullets.len()).rev() {
            if !overlaps(&bullets[j], &enemies[i]) {
                continue;
            }
            let bullet = bullets.remove(j);
            let enemy = &mut enemies[i];
            enemy.health -= bullet.damage.max(1) as i32;
            enemy.hit_flash = HIT_FLASH_FRAMES;
            apply_knockback(enemy, &bullet, knockback_multiplier);
            hooks.notify(GameEvent::Hit);

            if enemy.health <= 0 {
                let spawned = ai::split_on_death(&enemies[i], catalog, now, rng);
                gained += enemies[i].score;
                enemies.extend(spawned);
                enemies.remove(i);
                hooks.notify(GameEvent::Explosion);
            }
            break;
        }
    }

    gained
}

/// Push the enemy along the bullet's travel, or away from the bullet if it
/// was not moving.
pub fn apply_knockback(enemy: &mut Enemy, bullet: &Bullet, multiplier: f32) {
    let (mut dx, mut dy) = (bullet.dx, bullet.dy);
    if dx == 0.0 && dy == 0.0 {
        let (ex, ey) = enemy.center();
        dx = ex - bullet.x;
        dy = ey - bullet.y;
    }
    let len = f32::hypot(dx, dy);
    if len == 0.0 {
        return;
    }
    let magnitude = BASE_KNOCKBACK * multiplier * (1.0 - enemy.knockback_resistance);
    enemy.x += dx / len * magnitude;
    enemy.y += dy / len * magnitude;
}

// ── Hazards ↔ player ──────────────────────────────────────────────────────────

/// Enemy contact costs one health, at most once per hit cooldown. Immunity
/// blocks it entirely. Returns `true` when the player is dead.
pub fn resolve_enemies_vs_player(
    enemies: &[Enemy],
    player: &mut Player,
    now: u64,
    hooks: &mut impl GameHooks,
) -> bool {
    if player.immune {
        return false;
    }
    for enemy in enemies.iter().rev() {
        if !overlaps(&*player, enemy) {
            continue;
        }
        let cooling = player
            .last_hit_at
            .is_some_and(|last| now.saturating_sub(last) < PLAYER_HIT_COOLDOWN_MS);
        if cooling {
            return false;
        }
        player.last_hit_at = Some(now);
        if damage_player(player, hooks) {
            return true;
        }
    }
    false
}

/// Every projectile touching the player is consumed and costs one health
/// unless the player is immune. Returns `true` when the player is dead.
pub fn resolve_projectiles_vs_player(
    projectiles: &mut Vec<Projectile>,
    player: &mut Player,
    hooks: &mut impl GameHooks,
) -> bool {
    for i in (0..projectiles.len()).rev() {
        if !overlaps(&*player, &projectiles[i]) {
            continue;
        }
        projectiles.remove(i);
        if player.immune {
            continue;
        }
        if damage_player(player, hooks) {
            return true;
        }
    }
    false
}

fn damage_player(player: &mut Player, hooks: &mut impl GameHooks) -> bool {
    player.health = (player.health - 1).max(0);
    hooks.notify(GameEvent::PlayerHurt);
    hooks.notify(GameEvent::HealthChanged { health: player.health, max: player.max_health });
    player.health <= 0
}

// ── Powerups ──────────────────────────────────────────────────────────────────

pub fn collect_powerups(
    powerups: &mut Vec<Powerup>,
    player: &mut Player,
    now: u64,
    hooks: &mut impl GameHooks,
) {
    for i in (0..powerups.len()).rev() {
        if overlaps(&*player, &powerups[i]) {
            let picked = powerups.remove(i);
            crate::powerups::apply(player, picked.kind, now, hooks);
        }
    }
}
