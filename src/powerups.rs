//! Powerup batches, pickup effects, and the timed buffs they grant.

use rand::Rng;

use crate::config::WorldConfig;
use crate::constants::*;
use crate::entities::{ActiveEffect, EffectKind, Player, Powerup, PowerupKind};
use crate::hooks::{GameEvent, GameHooks};

/// Replace whatever is on the field with a fresh batch of 2–3 powerups.
pub fn spawn_batch(powerups: &mut Vec<Powerup>, world: &WorldConfig, rng: &mut impl Rng) {
    powerups.clear();
    let count = rng.gen_range(POWERUP_BATCH_MIN..=POWERUP_BATCH_MAX);
    let max_x = (world.width - POWERUP_EDGE_MARGIN).max(0.0);
    let max_y = (world.height - POWERUP_EDGE_MARGIN).max(0.0);
    for _ in 0..count {
        let kind = PowerupKind::ALL[rng.gen_range(0..PowerupKind::ALL.len())];
        powerups.push(Powerup {
            x: rng.gen::<f32>() * max_x,
            y: rng.gen::<f32>() * max_y,
            width: POWERUP_SIZE,
            height: POWERUP_SIZE,
            kind,
        });
    }
}

/// Apply a picked-up powerup to the player.
pub fn apply(player: &mut Player, kind: PowerupKind, now: u64, hooks: &mut impl GameHooks) {
    match kind {
        PowerupKind::Ammo => {
            player.reserve_ammo += AMMO_PICKUP_ROUNDS;
            hooks.notify(GameEvent::AmmoChanged { ammo: player.ammo, reserve: player.reserve_ammo });
        }
        PowerupKind::Health => {
            player.health = (player.health + HEALTH_PICKUP).min(player.max_health);
            hooks.notify(GameEvent::HealthChanged { health: player.health, max: player.max_health });
        }
        PowerupKind::DoubleDamage => grant(player, EffectKind::DoubleDamage, now + DOUBLE_DAMAGE_MS),
        PowerupKind::Immunity => grant(player, EffectKind::Immunity, now + IMMUNITY_MS),
        PowerupKind::TripleShot => grant(player, EffectKind::TripleShot, now + TRIPLE_SHOT_MS),
    }
    hooks.notify(GameEvent::Powerup(kind));
}

/// Start or restart a timed effect. A repeat pickup replaces the expiry.
pub fn grant(player: &mut Player, kind: EffectKind, expires_at: u64) {
    match player.effects.iter_mut().find(|e| e.kind == kind) {
        Some(effect) => effect.expires_at = expires_at,
        None => player.effects.push(ActiveEffect { kind, expires_at }),
    }
    set_flag(player, kind, true);
}

/// Drop lapsed effects and bring the player's buff flags in line.
pub fn refresh_effects(player: &mut Player, now: u64) {
    player.effects.retain(|e| e.expires_at > now);
    for kind in [EffectKind::DoubleDamage, EffectKind::Immunity, EffectKind::TripleShot] {
        let active = player.effects.iter().any(|e| e.kind == kind);
        set_flag(player, kind, active);
    }
}

fn set_flag(player: &mut Player, kind: EffectKind, on: bool) {
    match kind {
        EffectKind::DoubleDamage => player.double_damage = on,
        EffectKind::Immunity => player.immune = on,
        EffectKind::TripleShot => player.triple_shot = on,
    }
}
