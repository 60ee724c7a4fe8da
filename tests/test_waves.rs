use rand::rngs::StdRng;
use rand::SeedableRng;

use wave_survivor::config::{builtin_waves, EnemyCatalog, EnemyTypeData, WaveDef, WorldConfig};
use wave_survivor::constants::*;
use wave_survivor::entities::*;
use wave_survivor::hooks::{GameEvent, NoHooks};
use wave_survivor::timers::{Scheduler, TimerAction};
use wave_survivor::waves::*;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Director parked in `AwaitingClear` after wave `index`.
fn awaiting_after(index: usize) -> WaveDirector {
    let mut director = WaveDirector::new();
    director.phase = WavePhase::AwaitingClear;
    director.current = Some(index);
    director
}

/// Arm the debounce on an empty field and hand back the timer it fired.
fn elapse_clear(director: &mut WaveDirector, wave_count: usize) -> Option<ClearDecision> {
    let mut timers = Scheduler::new();
    director.check_clear(0, &mut timers, 1, 0);
    let due = timers.take_due(WAVE_CLEAR_DEBOUNCE_MS);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].action, TimerAction::WaveClear);
    director.on_clear_elapsed(due[0].id, 0, wave_count)
}

// ── start_wave ────────────────────────────────────────────────────────────────

#[test]
fn start_wave_queues_every_enemy_and_drops_powerups() {
    let mut director = WaveDirector::new();
    let mut powerups = Vec::new();
    let mut events: Vec<GameEvent> = Vec::new();

    let started = director.start_wave(1, &builtin_waves(), &mut powerups, &WorldConfig::default(), &mut seeded_rng(), &mut events);
    assert!(started);
    assert_eq!(director.phase, WavePhase::Spawning);
    assert_eq!(director.current, Some(1));
    assert_eq!(director.wave_number(), 2);
    assert_eq!(director.queue.len(), 9);
    assert_eq!(director.queue.iter().filter(|k| *k == "fast").count(), 2);
    assert!((POWERUP_BATCH_MIN..=POWERUP_BATCH_MAX).contains(&powerups.len()));
    assert_eq!(events, vec![GameEvent::WaveStarted(2)]);
}

#[test]
fn start_wave_past_table_changes_nothing() {
    let mut director = WaveDirector::new();
    let mut powerups = Vec::new();
    let mut events: Vec<GameEvent> = Vec::new();
    assert!(!director.start_wave(2, &builtin_waves(), &mut powerups, &WorldConfig::default(), &mut seeded_rng(), &mut events));
    assert_eq!(director.phase, WavePhase::Idle);
    assert!(powerups.is_empty());
    assert!(events.is_empty());
}

// ── spawn_tick ────────────────────────────────────────────────────────────────

#[test]
fn spawns_follow_the_cadence_along_the_top_edge() {
    let world = WorldConfig::default();
    let catalog = EnemyCatalog::builtin();
    let mut rng = seeded_rng();
    let mut director = WaveDirector::new();
    director.start_wave(0, &builtin_waves(), &mut Vec::new(), &world, &mut rng, &mut NoHooks);
    let mut enemies = Vec::new();

    for _ in 0..WAVE_SPAWN_INTERVAL - 1 {
        director.spawn_tick(&mut enemies, &catalog, &world, 0, &mut rng);
    }
    assert!(enemies.is_empty());

    director.spawn_tick(&mut enemies, &catalog, &world, 0, &mut rng);
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].y, 0.0);
    assert!(enemies[0].x >= 0.0 && enemies[0].x <= world.width - enemies[0].width);

    for _ in 0..4 * WAVE_SPAWN_INTERVAL {
        director.spawn_tick(&mut enemies, &catalog, &world, 0, &mut rng);
    }
    assert_eq!(enemies.len(), 5);
    assert_eq!(director.phase, WavePhase::AwaitingClear);
}

#[test]
fn unknown_type_spawns_as_basic_under_its_own_name() {
    let world = WorldConfig::default();
    let waves = vec![WaveDef::new(1, &[("ghoul", 1)])];
    let mut rng = seeded_rng();
    let mut director = WaveDirector::new();
    director.start_wave(0, &waves, &mut Vec::new(), &world, &mut rng, &mut NoHooks);

    let mut enemies = Vec::new();
    for _ in 0..WAVE_SPAWN_INTERVAL {
        director.spawn_tick(&mut enemies, &EnemyCatalog::builtin(), &world, 0, &mut rng);
    }
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].kind, "ghoul");
    assert_eq!(enemies[0].speed, 2.0);
    assert_eq!(enemies[0].health, 1);
    assert_eq!(director.phase, WavePhase::AwaitingClear);
}

#[test]
fn empty_wave_goes_straight_to_awaiting_clear() {
    let world = WorldConfig::default();
    let waves = vec![WaveDef::new(1, &[])];
    let mut rng = seeded_rng();
    let mut director = WaveDirector::new();
    director.start_wave(0, &waves, &mut Vec::new(), &world, &mut rng, &mut NoHooks);
    director.spawn_tick(&mut Vec::new(), &EnemyCatalog::builtin(), &world, 0, &mut rng);
    assert_eq!(director.phase, WavePhase::AwaitingClear);
}

// ── Clear debounce ────────────────────────────────────────────────────────────

#[test]
fn no_debounce_while_still_spawning() {
    let mut director = WaveDirector::new();
    director.start_wave(0, &builtin_waves(), &mut Vec::new(), &WorldConfig::default(), &mut seeded_rng(), &mut NoHooks);
    let mut timers = Scheduler::new();
    director.check_clear(0, &mut timers, 1, 0);
    assert!(timers.is_empty());
}

#[test]
fn debounce_is_armed_once() {
    let mut director = awaiting_after(0);
    let mut timers = Scheduler::new();
    director.check_clear(0, &mut timers, 1, 0);
    director.check_clear(0, &mut timers, 1, 16);
    assert_eq!(timers.len(), 1);
    assert!(director.clear_timer.is_some());
}

#[test]
fn debounce_is_cancelled_when_enemies_reappear() {
    let mut director = awaiting_after(0);
    let mut timers = Scheduler::new();
    director.check_clear(0, &mut timers, 1, 0);
    let armed = director.clear_timer;

    // A summoned minion shows up before the debounce elapses.
    director.check_clear(1, &mut timers, 1, 500);
    assert!(timers.is_empty());
    assert_eq!(director.clear_timer, None);
    if let Some(id) = armed {
        assert_eq!(director.on_clear_elapsed(id, 0, 2), None);
    }
}

#[test]
fn refilled_field_voids_elapsed_debounce() {
    let mut director = awaiting_after(0);
    let mut timers = Scheduler::new();
    director.check_clear(0, &mut timers, 1, 0);
    let due = timers.take_due(WAVE_CLEAR_DEBOUNCE_MS);
    assert_eq!(director.on_clear_elapsed(due[0].id, 3, 2), None);
    assert_eq!(director.phase, WavePhase::AwaitingClear);
    assert_eq!(director.clear_timer, None);
}

#[test]
fn clear_advances_to_next_wave() {
    let mut director = awaiting_after(0);
    assert_eq!(elapse_clear(&mut director, 2), Some(ClearDecision::StartWave(1)));
}

#[test]
fn clear_after_last_wave_is_victory() {
    let mut director = awaiting_after(1);
    assert_eq!(elapse_clear(&mut director, 2), Some(ClearDecision::Victory));
    assert_eq!(director.phase, WavePhase::Complete);
}

#[test]
fn upgrade_screen_precedes_every_third_wave_once() {
    let mut director = awaiting_after(UPGRADE_WAVE_INTERVAL - 1);
    assert_eq!(elapse_clear(&mut director, 9), Some(ClearDecision::OpenUpgrades));
    assert_eq!(director.phase, WavePhase::Upgrading);

    // While the screen is up nothing re-arms.
    let mut timers = Scheduler::new();
    director.check_clear(0, &mut timers, 1, 0);
    assert!(timers.is_empty());

    director.close_upgrades();
    assert_eq!(director.phase, WavePhase::AwaitingClear);
    assert_eq!(elapse_clear(&mut director, 9), Some(ClearDecision::StartWave(UPGRADE_WAVE_INTERVAL)));
    assert!(!director.upgrade_shown);
}

#[test]
fn upgrade_screen_before_final_victory() {
    // Three waves in the table: clearing the third still offers upgrades first.
    let mut director = awaiting_after(2);
    assert_eq!(elapse_clear(&mut director, 3), Some(ClearDecision::OpenUpgrades));
    director.close_upgrades();
    assert_eq!(elapse_clear(&mut director, 3), Some(ClearDecision::Victory));
}

#[test]
fn skipped_upgrade_screen_moves_on() {
    let mut director = awaiting_after(UPGRADE_WAVE_INTERVAL - 1);
    assert_eq!(elapse_clear(&mut director, 9), Some(ClearDecision::OpenUpgrades));
    assert_eq!(director.skip_upgrades(9), ClearDecision::StartWave(UPGRADE_WAVE_INTERVAL));
    assert!(!director.upgrade_shown);

    let mut last = awaiting_after(2);
    assert_eq!(elapse_clear(&mut last, 3), Some(ClearDecision::OpenUpgrades));
    assert_eq!(last.skip_upgrades(3), ClearDecision::Victory);
    assert_eq!(last.phase, WavePhase::Complete);
}

#[test]
fn reset_returns_to_idle() {
    let mut director = awaiting_after(4);
    director.upgrade_shown = true;
    director.queue.push_back("basic".to_string());
    director.reset();
    assert_eq!(director.phase, WavePhase::Idle);
    assert_eq!(director.current, None);
    assert!(director.queue.is_empty());
    assert!(!director.upgrade_shown);
    assert_eq!(director.wave_number(), 0);
}

#[test]
fn spawned_enemy_uses_catalog_stats() {
    let world = WorldConfig::default();
    let waves = vec![WaveDef::new(1, &[("tank", 1)])];
    let mut rng = seeded_rng();
    let mut director = WaveDirector::new();
    director.start_wave(0, &waves, &mut Vec::new(), &world, &mut rng, &mut NoHooks);
    let mut enemies: Vec<Enemy> = Vec::new();
    for _ in 0..WAVE_SPAWN_INTERVAL {
        director.spawn_tick(&mut enemies, &EnemyCatalog::builtin(), &world, 7, &mut rng);
    }
    let expected = EnemyTypeData::new(1.0, 3, "purple");
    assert_eq!(enemies[0].speed, expected.speed);
    assert_eq!(enemies[0].max_health, expected.health);
    assert_eq!(enemies[0].color, "purple");
    assert_eq!(enemies[0].last_ability_at, 7);
}
