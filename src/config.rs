//! Static game data: the enemy-type catalog, the wave table, and world
//! dimensions.
//!
//! Catalog and waves are read from JSON. Any failure to read or parse them is
//! logged and replaced by the small built-in sets, so a missing data
//! directory never stops a run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Enemy catalog ─────────────────────────────────────────────────────────────

/// One catalog entry, as found in `zombies.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTypeData {
    pub speed: f32,
    pub health: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub knockback_resistance: Option<f32>,
}

impl EnemyTypeData {
    pub fn new(speed: f32, health: i32, color: &str) -> Self {
        EnemyTypeData {
            speed,
            health,
            color: Some(color.to_string()),
            size: None,
            score: None,
            knockback_resistance: None,
        }
    }
}

/// Type name → stats. Unknown names resolve to `basic`.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyCatalog {
    types: BTreeMap<String, EnemyTypeData>,
}

impl EnemyCatalog {
    pub fn new(types: BTreeMap<String, EnemyTypeData>) -> Self {
        EnemyCatalog { types }
    }

    /// basic / fast / tank.
    pub fn builtin() -> Self {
        let mut types = BTreeMap::new();
        types.insert("basic".to_string(), EnemyTypeData::new(2.0, 1, "red"));
        types.insert("fast".to_string(), EnemyTypeData::new(4.0, 1, "orange"));
        types.insert("tank".to_string(), EnemyTypeData::new(1.0, 3, "purple"));
        EnemyCatalog { types }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let types: BTreeMap<String, EnemyTypeData> =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })?;
        if types.is_empty() {
            return Err(ConfigError::Empty { what: "enemy catalog" });
        }
        Ok(EnemyCatalog { types })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = read(path)?;
        Self::from_json(&text).map_err(|e| e.with_path(path))
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(path = %path.display(), types = catalog.len(), "loaded enemy catalog");
                catalog
            }
            Err(err) => {
                tracing::warn!("{err}; using built-in enemy catalog");
                Self::builtin()
            }
        }
    }

    pub fn get(&self, kind: &str) -> Option<&EnemyTypeData> {
        self.types.get(kind)
    }

    /// The entry for `kind`, or the `basic` entry when `kind` is unknown.
    pub fn resolve(&self, kind: &str) -> Option<&EnemyTypeData> {
        self.types.get(kind).or_else(|| self.types.get("basic"))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WaveEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WaveDef {
    /// Display number; the director indexes waves by position, not by this.
    #[serde(default)]
    pub wave: u32,
    pub zombies: Vec<WaveEntry>,
}

impl WaveDef {
    pub fn new(wave: u32, zombies: &[(&str, u32)]) -> Self {
        WaveDef {
            wave,
            zombies: zombies
                .iter()
                .map(|(kind, count)| WaveEntry { kind: kind.to_string(), count: *count })
                .collect(),
        }
    }

    pub fn total(&self) -> u32 {
        self.zombies.iter().map(|z| z.count).sum()
    }
}

pub fn builtin_waves() -> Vec<WaveDef> {
    vec![
        WaveDef::new(1, &[("basic", 5)]),
        WaveDef::new(2, &[("basic", 7), ("fast", 2)]),
    ]
}

pub fn waves_from_json(text: &str) -> Result<Vec<WaveDef>, ConfigError> {
    let waves: Vec<WaveDef> =
        serde_json::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })?;
    if waves.is_empty() {
        return Err(ConfigError::Empty { what: "wave table" });
    }
    Ok(waves)
}

pub fn load_waves(path: &Path) -> Result<Vec<WaveDef>, ConfigError> {
    let text = read(path)?;
    waves_from_json(&text).map_err(|e| e.with_path(path))
}

pub fn load_waves_or_default(path: &Path) -> Vec<WaveDef> {
    match load_waves(path) {
        Ok(waves) => {
            tracing::info!(path = %path.display(), waves = waves.len(), "loaded wave table");
            waves
        }
        Err(err) => {
            tracing::warn!("{err}; using built-in waves");
            builtin_waves()
        }
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Visible area the camera frames, in world units.
    pub view_width: f32,
    pub view_height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig { width: 2000.0, height: 1500.0, view_width: 1280.0, view_height: 720.0 }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: Option<PathBuf>, source: serde_json::Error },
    Empty { what: &'static str },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            ConfigError::Parse { path: None, source } => {
                ConfigError::Parse { path: Some(path.to_path_buf()), source }
            }
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse { path: Some(path), source } => {
                write!(f, "invalid JSON in {}: {source}", path.display())
            }
            ConfigError::Parse { path: None, source } => write!(f, "invalid JSON: {source}"),
            ConfigError::Empty { what } => write!(f, "{what} is empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Empty { .. } => None,
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
}
