//! Game settings
//!
//! Loaded from an optional JSON file; every field has a default so a
//! partial file is fine. Defaults reproduce the reference game.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{STARTING_LIVES, TICKS_PER_SECOND};
use crate::error::ConfigError;
use crate::persistence::score::DEFAULT_MAX_TIME_SECS;
use crate::platform::KeyBindings;
use crate::sim::LevelSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last level before the game wraps back to level 1
    pub max_level: u32,
    pub starting_lives: u8,
    /// Completion time at which the time bonus runs out
    pub score_max_time_secs: u32,
    /// Seed for patrol decisions
    pub seed: u64,
    /// Custom level definitions; built-in levels when unset
    pub levels_path: Option<PathBuf>,
    /// Progress save file; progress is kept in memory when unset
    pub save_path: Option<PathBuf>,
    pub bindings: KeyBindings,

    // === Headless runner ===
    /// Ticks the headless runner simulates before stopping
    pub run_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_level: 3,
            starting_lives: STARTING_LIVES,
            score_max_time_secs: DEFAULT_MAX_TIME_SECS,
            seed: 0x5eed,
            levels_path: None,
            save_path: None,
            bindings: KeyBindings::default(),
            run_ticks: 120 * TICKS_PER_SECOND as u64,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Level set named by `levels_path`, or the built-in levels
    pub fn load_levels(&self) -> LevelSet {
        let Some(path) = &self.levels_path else {
            return LevelSet::builtin();
        };
        match LevelSet::load(path) {
            Ok(levels) => {
                log::info!("Loaded {} levels from {}", levels.levels.len(), path.display());
                levels
            }
            Err(e) => {
                log::warn!("Using built-in levels ({}: {})", path.display(), e);
                LevelSet::builtin()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "max_level": 2, "seed": 42 }"#).unwrap();
        assert_eq!(settings.max_level, 2);
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(settings.score_max_time_secs, 300);
        assert_eq!(settings.bindings, KeyBindings::default());
    }

    #[test]
    fn test_bad_file_falls_back() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Settings::load(&dir.path().join("missing.json")), Settings::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, r#"{ "max_level": "three" }"#).unwrap();
        assert_eq!(Settings::load(&broken), Settings::default());
        assert!(matches!(Settings::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            Settings::from_json(r#"{ "max_level": "three" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            seed: 7,
            save_path: Some(PathBuf::from("progress.json")),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_missing_levels_file_uses_builtin() {
        let settings = Settings {
            levels_path: Some(PathBuf::from("/nonexistent/levels.json")),
            ..Default::default()
        };
        assert_eq!(settings.load_levels().max_level(), 3);
    }
}
