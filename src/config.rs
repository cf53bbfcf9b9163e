//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to defaults if the file is missing or incomplete.
//!
//! ```toml
//! [speed]
//! tick_rate_ms = 16
//!
//! [physics]
//! player_x_speed = 7.0
//! gravity = 30.0
//! jump_speed = 17.0
//! max_step = 0.05
//!
//! [general]
//! levels_file = "levels.json"
//! ```

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub physics: PhysicsConfig,
    /// JSON level list. `None` = built-in levels.
    pub levels_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

/// Player motion tuning used by the simulation driver.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub player_x_speed: f64,
    pub gravity: f64,
    pub jump_speed: f64,
    /// Longest sub-step a single `advance` call simulates at once.
    pub max_step: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            player_x_speed: default_player_x_speed(),
            gravity: default_gravity(),
            jump_speed: default_jump_speed(),
            max_step: default_max_step(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_player_x_speed")]
    player_x_speed: f64,
    #[serde(default = "default_gravity")]
    gravity: f64,
    #[serde(default = "default_jump_speed")]
    jump_speed: f64,
    #[serde(default = "default_max_step")]
    max_step: f64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    levels_file: Option<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }
fn default_player_x_speed() -> f64 { 7.0 }
fn default_gravity() -> f64 { 30.0 }
fn default_jump_speed() -> f64 { 17.0 }
fn default_max_step() -> f64 { 0.05 }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            player_x_speed: default_player_x_speed(),
            gravity: default_gravity(),
            jump_speed: default_jump_speed(),
            max_step: default_max_step(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly. Relative level paths stay relative.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let levels_file = toml_cfg.general.levels_file.map(|name| {
            let path = PathBuf::from(&name);
            if path.is_absolute() {
                path
            } else {
                search_dirs.iter()
                    .map(|d| d.join(&name))
                    .find(|p| p.is_file())
                    .unwrap_or(path)
            }
        });

        let mut physics = PhysicsConfig {
            player_x_speed: toml_cfg.physics.player_x_speed,
            gravity: toml_cfg.physics.gravity,
            jump_speed: toml_cfg.physics.jump_speed,
            max_step: toml_cfg.physics.max_step,
        };
        if !(physics.max_step > 0.0 && physics.max_step.is_finite()) {
            log::warn!("physics.max_step must be positive, using {}", default_max_step());
            physics.max_step = default_max_step();
        }

        GameConfig {
            speed: SpeedConfig { tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1) },
            physics,
            levels_file,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        log::info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
