use crate::model::Difficulty;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CURRENT_VERSION: u32 = 1;

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_autosave_debounce")]
    pub autosave_debounce: Duration,

    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_max_saved_game_age")]
    pub max_saved_game_age: Duration,

    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_tick_interval")]
    pub tick_interval: Duration,
}

// Helper functions for default values
fn default_version() -> u32 {
    0
}
fn default_autosave_debounce() -> Duration {
    Duration::from_millis(1000)
}
fn default_max_saved_game_age() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}
fn default_tick_interval() -> Duration {
    Duration::from_millis(1000)
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: CURRENT_VERSION,
            difficulty: Difficulty::default(),
            autosave_debounce: default_autosave_debounce(),
            max_saved_game_age: default_max_saved_game_age(),
            tick_interval: default_tick_interval(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    /// Reads settings from `path`, falling back to (and writing) defaults
    /// when the file is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(err) => {
                    warn!(target: "settings", "Ignoring unreadable settings {:?}: {}", path, err)
                }
            }
        }
        let default = Settings::default();
        if let Err(err) = default.save_to(path) {
            warn!(target: "settings", "Could not write default settings {:?}: {}", path, err);
        }
        default
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        let mut path = config_dir.join("chainbreaker");
        path.push("settings.json");
        path
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                // unversioned files predate the configurable tick
                self.tick_interval = default_tick_interval();
                self.version = CURRENT_VERSION;
            }
            _ => (),
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}
