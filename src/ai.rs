//! Enemy AI: straight-line seek toward the player, pairwise separation, and
//! the type-gated special abilities.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::{EnemyCatalog, EnemyTypeData};
use crate::constants::*;
use crate::entities::{Bounds, Enemy, EnemyRole, Player, Projectile};

/// Everything the director does to enemies in one frame, in order:
/// seek, separation, hit-flash decay, then abilities.
pub fn update_enemies(
    enemies: &mut Vec<Enemy>,
    projectiles: &mut Vec<Projectile>,
    player: &Player,
    catalog: &EnemyCatalog,
    now: u64,
    rng: &mut impl Rng,
) {
    seek(enemies, player);
    separate(enemies);
    for e in enemies.iter_mut() {
        e.hit_flash = e.hit_flash.saturating_sub(1);
    }
    summon_minions(enemies, catalog, now, rng);
    update_juggernauts(enemies, player);
    throw_projectiles(enemies, projectiles, player, now);
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Move every enemy `speed` units along the line to the player's centre.
pub fn seek(enemies: &mut [Enemy], player: &Player) {
    let (px, py) = player.center();
    for e in enemies.iter_mut() {
        let (ex, ey) = e.center();
        let dx = px - ex;
        let dy = py - ey;
        let dist = f32::hypot(dx, dy);
        if dist > 0.0 {
            e.x += dx / dist * e.speed;
            e.y += dy / dist * e.speed;
        }
    }
}

/// Single pass over every unique pair: overlapping centres are pushed apart
/// symmetrically by half the overlap. Dense clusters settle over several frames.
pub fn separate(enemies: &mut [Enemy]) {
    for i in 0..enemies.len() {
        for j in (i + 1)..enemies.len() {
            let (ax, ay) = enemies[i].center();
            let (bx, by) = enemies[j].center();
            let dx = ax - bx;
            let dy = ay - by;
            let dist = f32::hypot(dx, dy);
            let min_dist = (enemies[i].width + enemies[j].width) * 0.5;
            if dist > 0.0 && dist < min_dist {
                let nx = dx / dist;
                let ny = dy / dist;
                let push = (min_dist - dist) / 2.0;
                enemies[i].x += nx * push;
                enemies[i].y += ny * push;
                enemies[j].x -= nx * push;
                enemies[j].y -= ny * push;
            }
        }
    }
}

// ── Abilities ─────────────────────────────────────────────────────────────────

/// Summoners call two minions onto a ring around themselves every 5 s.
pub fn summon_minions(enemies: &mut Vec<Enemy>, catalog: &EnemyCatalog, now: u64, rng: &mut impl Rng) {
    let mut minion = catalog.get(MINION_TYPE).cloned().unwrap_or_else(minion_fallback);
    minion.size.get_or_insert(MINION_FALLBACK_SIZE);
    let count = enemies.len();
    for i in 0..count {
        if enemies[i].role != EnemyRole::Summoner {
            continue;
        }
        if now.saturating_sub(enemies[i].last_ability_at) < SUMMON_INTERVAL_MS {
            continue;
        }
        let (cx, cy) = enemies[i].center();
        for _ in 0..SUMMON_COUNT {
            let spawned = spawn_on_ring(
                MINION_TYPE,
                &minion,
                (cx, cy),
                SUMMON_RING_MIN,
                SUMMON_RING_SPAN,
                now,
                rng,
            );
            enemies.push(spawned);
        }
        enemies[i].last_ability_at = now;
    }
}

/// Juggernauts plod near the player and charge from afar. The new speed takes
/// effect on the next frame's seek.
pub fn update_juggernauts(enemies: &mut [Enemy], player: &Player) {
    let (px, py) = player.center();
    for e in enemies.iter_mut().filter(|e| e.role == EnemyRole::Juggernaut) {
        let base = if e.base_speed > 0.0 { e.base_speed } else { JUGGERNAUT_FALLBACK_SPEED };
        let (ex, ey) = e.center();
        let dist = f32::hypot(px - ex, py - ey);
        e.speed = if dist > JUGGERNAUT_CHARGE_DISTANCE {
            base * JUGGERNAUT_CHARGE_MULTIPLIER
        } else {
            base
        };
    }
}

/// Throwers lob a projectile at the player every 3 s. A thrower sitting on
/// the player's centre skips the throw but still restarts its cooldown.
pub fn throw_projectiles(
    enemies: &mut [Enemy],
    projectiles: &mut Vec<Projectile>,
    player: &Player,
    now: u64,
) {
    let (px, py) = player.center();
    for e in enemies.iter_mut().filter(|e| e.role == EnemyRole::Thrower) {
        if now.saturating_sub(e.last_ability_at) < THROW_INTERVAL_MS {
            continue;
        }
        let (ex, ey) = e.center();
        let dx = px - ex;
        let dy = py - ey;
        let dist = f32::hypot(dx, dy);
        if dist > 0.0 {
            projectiles.push(Projectile {
                x: ex - THROW_WIDTH / 2.0,
                y: ey - THROW_HEIGHT / 2.0,
                dx: dx / dist * THROW_SPEED,
                dy: dy / dist * THROW_SPEED,
                width: THROW_WIDTH,
                height: THROW_HEIGHT,
                source: e.kind.clone(),
            });
        }
        e.last_ability_at = now;
    }
}

/// Enemies that replace a dying spitter. Empty for any other role, or when
/// the catalog has no post-split type.
pub fn split_on_death(
    dead: &Enemy,
    catalog: &EnemyCatalog,
    now: u64,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    if dead.role != EnemyRole::Spitter {
        return Vec::new();
    }
    let Some(data) = catalog.get(SPLIT_TYPE) else {
        return Vec::new();
    };
    let mut data = data.clone();
    data.size.get_or_insert(SPLIT_FALLBACK_SIZE);
    (0..SPLIT_COUNT)
        .map(|_| {
            spawn_on_ring(SPLIT_TYPE, &data, dead.center(), SPLIT_RING_MIN, SPLIT_RING_SPAN, now, rng)
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn spawn_on_ring(
    kind: &str,
    data: &EnemyTypeData,
    center: (f32, f32),
    radius_min: f32,
    radius_span: f32,
    now: u64,
    rng: &mut impl Rng,
) -> Enemy {
    let angle = rng.gen::<f32>() * TAU;
    let dist = radius_min + rng.gen::<f32>() * radius_span;
    let size = data.size.unwrap_or(DEFAULT_ENEMY_SIZE);
    let x = center.0 + angle.cos() * dist - size / 2.0;
    let y = center.1 + angle.sin() * dist - size / 2.0;
    Enemy::from_data(kind, data, x, y, now)
}

fn minion_fallback() -> EnemyTypeData {
    EnemyTypeData {
        speed: MINION_FALLBACK_SPEED,
        health: MINION_FALLBACK_HEALTH,
        color: Some("gray".to_string()),
        size: Some(MINION_FALLBACK_SIZE),
        score: None,
        knockback_resistance: None,
    }
}
