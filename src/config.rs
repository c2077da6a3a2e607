use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Gameplay constants.  All rates are per simulation tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub base_speed: f32,
    /// Added to the speed for every elapsed tick.
    pub speed_ramp: f32,
    /// Upper bound on the speed.  `None` keeps the ramp linear forever.
    pub max_speed: Option<f32>,
    pub gravity: f32,
    pub jump_power: f32,
    /// Distance gained per unit of speed.
    pub distance_factor: f32,
    pub collision_margin: f32,

    pub obstacle_interval_start: f32,
    pub obstacle_interval_decay: f32,
    pub obstacle_interval_floor: f32,

    pub collectible_interval: u32,
    pub collectible_chance: f64,
    pub grass_interval: (f32, f32),
    pub grass_chance: f64,
    pub pebble_interval: (f32, f32),
    pub pebble_chance: f64,

    /// Energy needed for each lighting step.
    pub energy_per_light_step: u32,
    pub light_step: f32,
    pub max_light_level: f32,

    /// Delay before a non-qualifying run is saved and the leaderboard shown.
    pub auto_save_delay_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 6.5,
            speed_ramp: 0.001,
            max_speed: None,
            gravity: 0.7,
            jump_power: -16.0,
            distance_factor: 0.1,
            collision_margin: 1.0,
            obstacle_interval_start: 90.0,
            obstacle_interval_decay: 0.015,
            obstacle_interval_floor: 45.0,
            collectible_interval: 150,
            collectible_chance: 0.6,
            grass_interval: (80.0, 120.0),
            grass_chance: 0.7,
            pebble_interval: (150.0, 250.0),
            pebble_chance: 0.3,
            energy_per_light_step: 25,
            light_step: 0.1,
            max_light_level: 0.95,
            auto_save_delay_ms: 2000,
        }
    }
}

/// User-facing settings, stored as JSON next to the score file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps: u32,
    /// Fixed RNG seed; a fresh one is drawn per launch when absent.
    pub seed: Option<u64>,
    /// First word of a character name, e.g. `"dave"`.
    pub character: Option<String>,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 60,
            seed: None,
            character: Some("dave".to_string()),
            tuning: Tuning::default(),
        }
    }
}

/// Read settings from `path`, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_settings(path: &Path) -> Settings {
    let Ok(s) = fs::read_to_string(path) else {
        return Settings::default();
    };
    match serde_json::from_str::<Settings>(&s) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ignoring malformed settings at {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let data = serde_json::to_vec_pretty(settings)?;
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
