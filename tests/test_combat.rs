use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use wave_survivor::combat::*;
use wave_survivor::config::{EnemyCatalog, EnemyTypeData, WorldConfig};
use wave_survivor::constants::*;
use wave_survivor::entities::*;
use wave_survivor::hooks::{GameEvent, NoHooks};
use wave_survivor::powerups;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_player() -> Player {
    Player::new(&WorldConfig::default())
}

fn enemy_at(kind: &str, x: f32, y: f32, health: i32) -> Enemy {
    Enemy::from_data(kind, &EnemyTypeData::new(2.0, health, "red"), x, y, 0)
}

fn bullet_at(x: f32, y: f32, damage: u32) -> Bullet {
    Bullet { x, y, dx: BULLET_SPEED, dy: 0.0, width: BULLET_SIZE, height: BULLET_SIZE, damage, double: false }
}

/// An enemy whose box fully covers the player's.
fn enemy_on(player: &Player) -> Enemy {
    enemy_at("basic", player.x - 8.0, player.y - 8.0, 1)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── overlaps ──────────────────────────────────────────────────────────────────

#[test]
fn touching_edges_do_not_overlap() {
    let a = bullet_at(0.0, 0.0, 1);
    let b = bullet_at(BULLET_SIZE, 0.0, 1);
    assert!(!overlaps(&a, &b));
    let c = bullet_at(BULLET_SIZE - 0.5, 0.0, 1);
    assert!(overlaps(&a, &c));
}

// ── Bullets ↔ enemies ─────────────────────────────────────────────────────────

#[test]
fn bullet_damages_at_most_one_enemy() {
    let mut enemies = vec![enemy_at("basic", 100.0, 100.0, 3), enemy_at("basic", 100.0, 100.0, 3)];
    let mut bullets = vec![bullet_at(110.0, 110.0, 1)];
    let mut events: Vec<GameEvent> = Vec::new();

    let gained = resolve_bullets_vs_enemies(
        &mut enemies, &mut bullets, 1.0, &EnemyCatalog::builtin(), 0, &mut seeded_rng(), &mut events,
    );
    assert_eq!(gained, 0);
    assert!(bullets.is_empty());
    let total: i32 = enemies.iter().map(|e| e.health).sum();
    assert_eq!(total, 5);
    assert_eq!(enemies.iter().filter(|e| e.hit_flash == HIT_FLASH_FRAMES).count(), 1);
    assert_eq!(events, vec![GameEvent::Hit]);
}

#[test]
fn missing_bullets_are_kept() {
    let mut enemies = vec![enemy_at("basic", 100.0, 100.0, 3)];
    let mut bullets = vec![bullet_at(500.0, 500.0, 1)];
    resolve_bullets_vs_enemies(
        &mut enemies, &mut bullets, 1.0, &EnemyCatalog::builtin(), 0, &mut seeded_rng(), &mut NoHooks,
    );
    assert_eq!(bullets.len(), 1);
    assert_eq!(enemies[0].health, 3);
}

#[test]
fn kill_scores_and_removes_enemy() {
    let mut data = EnemyTypeData::new(2.0, 1, "red");
    data.score = Some(25);
    let mut enemies = vec![Enemy::from_data("basic", &data, 100.0, 100.0, 0)];
    // Two bullets on the same enemy: the first kills it, the second survives.
    let mut bullets = vec![bullet_at(110.0, 110.0, 1), bullet_at(112.0, 112.0, 1)];
    let mut events: Vec<GameEvent> = Vec::new();

    let gained = resolve_bullets_vs_enemies(
        &mut enemies, &mut bullets, 1.0, &EnemyCatalog::builtin(), 0, &mut seeded_rng(), &mut events,
    );
    assert_eq!(gained, 25);
    assert!(enemies.is_empty());
    assert_eq!(bullets.len(), 1);
    assert_eq!(events, vec![GameEvent::Hit, GameEvent::Explosion]);
}

#[test]
fn enemy_health_never_exceeds_max_under_fire() {
    let mut enemies: Vec<Enemy> = (0..5).map(|i| enemy_at("tank", 100.0 * i as f32, 0.0, 4)).collect();
    let mut rng = seeded_rng();
    for round in 0..3 {
        let mut bullets: Vec<Bullet> = enemies.iter().map(|e| bullet_at(e.x + 10.0, e.y + 10.0, 1)).collect();
        resolve_bullets_vs_enemies(&mut enemies, &mut bullets, 1.0, &EnemyCatalog::builtin(), round, &mut rng, &mut NoHooks);
        assert!(enemies.iter().all(|e| e.health <= e.max_health && e.health > 0));
    }
    assert!(enemies.iter().all(|e| e.health == 1));
}

#[test]
fn dying_spitter_splits_in_two() {
    let mut types = BTreeMap::new();
    types.insert("basic".to_string(), EnemyTypeData::new(2.0, 1, "red"));
    types.insert("Spitter1".to_string(), EnemyTypeData::new(2.5, 1, "yellow"));
    let catalog = EnemyCatalog::new(types);

    let mut enemies = vec![enemy_at("Spitter", 300.0, 300.0, 1)];
    let mut bullets = vec![bullet_at(310.0, 310.0, 1)];
    let gained = resolve_bullets_vs_enemies(&mut enemies, &mut bullets, 1.0, &catalog, 0, &mut seeded_rng(), &mut NoHooks);

    assert_eq!(gained, DEFAULT_ENEMY_SCORE);
    assert_eq!(enemies.len(), 2);
    assert!(enemies.iter().all(|e| e.kind == "Spitter1" && e.width == SPLIT_FALLBACK_SIZE));
}

// ── Knockback ─────────────────────────────────────────────────────────────────

#[test]
fn knockback_follows_bullet_direction() {
    let mut e = enemy_at("basic", 100.0, 100.0, 5);
    apply_knockback(&mut e, &bullet_at(0.0, 0.0, 1), 1.0);
    assert!(approx(e.x, 100.0 + BASE_KNOCKBACK));
    assert!(approx(e.y, 100.0));
}

#[test]
fn knockback_scales_with_multiplier_and_resistance() {
    let mut e = enemy_at("basic", 100.0, 100.0, 5);
    apply_knockback(&mut e, &bullet_at(0.0, 0.0, 1), 1.4);
    assert!(approx(e.x, 100.0 + BASE_KNOCKBACK * 1.4));

    let mut data = EnemyTypeData::new(1.0, 5, "purple");
    data.knockback_resistance = Some(0.5);
    let mut tank = Enemy::from_data("tank", &data, 100.0, 100.0, 0);
    apply_knockback(&mut tank, &bullet_at(0.0, 0.0, 1), 1.0);
    assert!(approx(tank.x, 100.0 + BASE_KNOCKBACK * 0.5));
}

#[test]
fn stationary_bullet_pushes_away_from_itself() {
    let mut e = enemy_at("basic", 100.0, 100.0, 5);
    let mut b = bullet_at(100.0, 116.0, 1);
    b.dx = 0.0;
    apply_knockback(&mut e, &b, 1.0);
    assert!(e.x > 100.0);
}

// ── Enemies ↔ player ──────────────────────────────────────────────────────────

#[test]
fn contact_respects_hit_cooldown() {
    let mut p = make_player();
    let enemies = vec![enemy_on(&p)];
    let mut events: Vec<GameEvent> = Vec::new();

    assert!(!resolve_enemies_vs_player(&enemies, &mut p, 5_000, &mut events));
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH - 1);
    assert_eq!(p.last_hit_at, Some(5_000));

    resolve_enemies_vs_player(&enemies, &mut p, 5_999, &mut events);
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH - 1);

    resolve_enemies_vs_player(&enemies, &mut p, 6_000, &mut events);
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH - 2);
    assert_eq!(events.iter().filter(|e| **e == GameEvent::PlayerHurt).count(), 2);
}

#[test]
fn crowd_contact_costs_one_health_per_cooldown() {
    let mut p = make_player();
    let enemies = vec![enemy_on(&p), enemy_on(&p), enemy_on(&p)];
    resolve_enemies_vs_player(&enemies, &mut p, 0, &mut NoHooks);
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH - 1);
}

#[test]
fn immune_player_takes_no_contact_damage() {
    let mut p = make_player();
    p.immune = true;
    let enemies = vec![enemy_on(&p)];
    assert!(!resolve_enemies_vs_player(&enemies, &mut p, 0, &mut NoHooks));
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH);
    assert_eq!(p.last_hit_at, None);
}

#[test]
fn lethal_contact_reports_death() {
    let mut p = make_player();
    p.health = 1;
    let enemies = vec![enemy_on(&p)];
    assert!(resolve_enemies_vs_player(&enemies, &mut p, 0, &mut NoHooks));
    assert_eq!(p.health, 0);
}

// ── Projectiles ↔ player ──────────────────────────────────────────────────────

fn projectile_on(player: &Player) -> Projectile {
    Projectile {
        x: player.x,
        y: player.y,
        dx: 0.0,
        dy: 0.0,
        width: THROW_WIDTH,
        height: THROW_HEIGHT,
        source: "thrower".to_string(),
    }
}

#[test]
fn every_touching_projectile_costs_health() {
    let mut p = make_player();
    let mut projectiles = vec![projectile_on(&p), projectile_on(&p)];
    assert!(!resolve_projectiles_vs_player(&mut projectiles, &mut p, &mut NoHooks));
    assert!(projectiles.is_empty());
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH - 2);
}

#[test]
fn immunity_absorbs_projectiles() {
    let mut p = make_player();
    p.immune = true;
    let mut projectiles = vec![projectile_on(&p)];
    resolve_projectiles_vs_player(&mut projectiles, &mut p, &mut NoHooks);
    assert!(projectiles.is_empty());
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH);
}

// ── Powerups ──────────────────────────────────────────────────────────────────

fn powerup_on(player: &Player, kind: PowerupKind) -> Powerup {
    Powerup { x: player.x, y: player.y, width: POWERUP_SIZE, height: POWERUP_SIZE, kind }
}

#[test]
fn ammo_pickup_adds_reserve() {
    let mut p = make_player();
    let mut field = vec![powerup_on(&p, PowerupKind::Ammo)];
    let mut events: Vec<GameEvent> = Vec::new();
    collect_powerups(&mut field, &mut p, 0, &mut events);
    assert!(field.is_empty());
    assert_eq!(p.reserve_ammo, PLAYER_START_RESERVE + AMMO_PICKUP_ROUNDS);
    assert!(events.contains(&GameEvent::Powerup(PowerupKind::Ammo)));
}

#[test]
fn health_pickup_is_capped() {
    let mut p = make_player();
    let mut field = vec![powerup_on(&p, PowerupKind::Health)];
    collect_powerups(&mut field, &mut p, 0, &mut NoHooks);
    assert_eq!(p.health, PLAYER_BASE_MAX_HEALTH);

    p.health = 5;
    let mut field = vec![powerup_on(&p, PowerupKind::Health)];
    collect_powerups(&mut field, &mut p, 0, &mut NoHooks);
    assert_eq!(p.health, 5 + HEALTH_PICKUP);
}

#[test]
fn repeat_double_damage_replaces_expiry() {
    let mut p = make_player();
    powerups::apply(&mut p, PowerupKind::DoubleDamage, 0, &mut NoHooks);
    powerups::apply(&mut p, PowerupKind::DoubleDamage, 4_000, &mut NoHooks);

    assert_eq!(p.effects.len(), 1);
    assert_eq!(p.effects[0].expires_at, 4_000 + DOUBLE_DAMAGE_MS);

    powerups::refresh_effects(&mut p, DOUBLE_DAMAGE_MS + 1);
    assert!(p.double_damage);
    powerups::refresh_effects(&mut p, 4_000 + DOUBLE_DAMAGE_MS);
    assert!(!p.double_damage);
    assert!(p.effects.is_empty());
}

#[test]
fn buffs_expire_independently() {
    let mut p = make_player();
    powerups::apply(&mut p, PowerupKind::Immunity, 0, &mut NoHooks);
    powerups::apply(&mut p, PowerupKind::TripleShot, 0, &mut NoHooks);
    assert!(p.immune && p.triple_shot);

    powerups::refresh_effects(&mut p, IMMUNITY_MS);
    assert!(!p.immune);
    assert!(p.triple_shot);
}

#[test]
fn spawn_batch_replaces_field_inside_world() {
    let world = WorldConfig::default();
    let mut field = vec![Powerup { x: 0.0, y: 0.0, width: 1.0, height: 1.0, kind: PowerupKind::Ammo }; 10];
    let mut rng = seeded_rng();
    for _ in 0..20 {
        powerups::spawn_batch(&mut field, &world, &mut rng);
        assert!((POWERUP_BATCH_MIN..=POWERUP_BATCH_MAX).contains(&field.len()));
        assert!(field.iter().all(|p| p.x >= 0.0
            && p.x <= world.width - POWERUP_EDGE_MARGIN
            && p.y >= 0.0
            && p.y <= world.height - POWERUP_EDGE_MARGIN));
    }
}
