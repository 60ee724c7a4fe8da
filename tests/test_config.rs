use std::path::Path;

use wave_survivor::config::*;

fn shipped(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

// ── Enemy catalog ─────────────────────────────────────────────────────────────

#[test]
fn catalog_reads_optional_fields() {
    let catalog = EnemyCatalog::from_json(
        r#"{
            "basic": { "speed": 2, "health": 1, "color": "red" },
            "tank": { "speed": 1, "health": 3, "size": 52, "score": 30, "knockbackResistance": 0.5 }
        }"#,
    )
    .unwrap();
    assert_eq!(catalog.len(), 2);
    let tank = catalog.get("tank").unwrap();
    assert_eq!(tank.size, Some(52.0));
    assert_eq!(tank.score, Some(30));
    assert_eq!(tank.knockback_resistance, Some(0.5));
    assert_eq!(tank.color, None);
}

#[test]
fn unknown_type_resolves_to_basic() {
    let catalog = EnemyCatalog::builtin();
    assert_eq!(catalog.resolve("ghoul"), catalog.get("basic"));
    assert_eq!(catalog.resolve("fast"), catalog.get("fast"));
    assert!(catalog.get("ghoul").is_none());
}

#[test]
fn builtin_catalog_has_three_types() {
    let catalog = EnemyCatalog::default();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.get("tank"), Some(&EnemyTypeData::new(1.0, 3, "purple")));
}

#[test]
fn empty_catalog_is_an_error() {
    assert!(matches!(EnemyCatalog::from_json("{}"), Err(ConfigError::Empty { .. })));
}

#[test]
fn missing_catalog_file_falls_back() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nope.json");
    assert!(matches!(EnemyCatalog::load(&path), Err(ConfigError::Io { .. })));
    assert_eq!(EnemyCatalog::load_or_default(&path), EnemyCatalog::builtin());
    Ok(())
}

#[test]
fn malformed_catalog_names_the_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("zombies.json");
    std::fs::write(&path, "{ not json")?;

    let err = EnemyCatalog::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { path: Some(_), .. }));
    assert!(err.to_string().contains("zombies.json"));
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(EnemyCatalog::load_or_default(&path), EnemyCatalog::builtin());
    Ok(())
}

#[test]
fn catalog_loads_from_disk() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("zombies.json");
    std::fs::write(&path, r#"{ "runner": { "speed": 5, "health": 1 } }"#)?;
    let catalog = EnemyCatalog::load_or_default(&path);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get("runner").map(|d| d.speed), Some(5.0));
    Ok(())
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn waves_parse_type_field() {
    let waves = waves_from_json(
        r#"[{ "wave": 1, "zombies": [{ "type": "basic", "count": 4 }, { "type": "fast", "count": 2 }] }]"#,
    )
    .unwrap();
    assert_eq!(waves.len(), 1);
    assert_eq!(waves[0].zombies[1].kind, "fast");
    assert_eq!(waves[0].total(), 6);
}

#[test]
fn wave_number_is_optional() {
    let waves = waves_from_json(r#"[{ "zombies": [] }]"#).unwrap();
    assert_eq!(waves[0].wave, 0);
    assert_eq!(waves[0].total(), 0);
}

#[test]
fn empty_wave_table_falls_back() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("wave.json");
    std::fs::write(&path, "[]")?;
    assert!(matches!(load_waves(&path), Err(ConfigError::Empty { .. })));
    assert_eq!(load_waves_or_default(&path), builtin_waves());
    Ok(())
}

#[test]
fn builtin_waves_match_defaults() {
    let waves = builtin_waves();
    assert_eq!(waves, vec![
        WaveDef::new(1, &[("basic", 5)]),
        WaveDef::new(2, &[("basic", 7), ("fast", 2)]),
    ]);
}

// ── Shipped data ──────────────────────────────────────────────────────────────

#[test]
fn shipped_data_parses() {
    let catalog = EnemyCatalog::load(&shipped("zombies.json")).unwrap();
    for kind in ["basic", "summoner", "minion", "Juggernaut", "thrower", "Spitter", "Spitter1"] {
        assert!(catalog.get(kind).is_some(), "missing {kind}");
    }

    let waves = load_waves(&shipped("wave.json")).unwrap();
    assert!(!waves.is_empty());
    for wave in &waves {
        for entry in &wave.zombies {
            assert!(catalog.get(&entry.kind).is_some(), "wave {} uses unknown {}", wave.wave, entry.kind);
        }
    }
}

#[test]
fn world_defaults() {
    let world = WorldConfig::default();
    assert_eq!((world.width, world.height), (2000.0, 1500.0));
    assert_eq!((world.view_width, world.view_height), (1280.0, 720.0));
}
