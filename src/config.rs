//! Runtime configuration (TOML).
//!
//! Looked up at `$FOCUSBLOCKS_CONFIG`, then `<config dir>/focusblocks/config.toml`,
//! then `config/focusblocks.toml`. A missing file is created with defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::GrantPolicy;
use crate::engine::SessionConfig;
use crate::types::{
    Weights, DEFAULT_GARBAGE_ROWS, DEFAULT_GRANT_MAX, DEFAULT_GRANT_MIN, PLAY_TICK_MS,
};

pub const CONFIG_ENV: &str = "FOCUSBLOCKS_CONFIG";
const FALLBACK_CONFIG_PATH: &str = "config/focusblocks.toml";
const STATE_FILE: &str = "state.json";
const LOG_FILE: &str = "focusblocks.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o: {0}")]
    Io(#[from] io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gravity interval while playing
    pub tick_ms: u64,
    /// Garbage rows on every fresh board
    pub garbage_rows: u8,
    /// Pieces granted per completed task, inclusive range
    pub grant_min: u32,
    pub grant_max: u32,
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
    /// Override for the persisted state file
    pub state_path: Option<PathBuf>,
    /// Weights used until the user saves their own
    pub weights: Weights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: u64::from(PLAY_TICK_MS),
            garbage_rows: DEFAULT_GARBAGE_ROWS,
            grant_min: DEFAULT_GRANT_MIN,
            grant_max: DEFAULT_GRANT_MAX,
            seed: None,
            state_path: None,
            weights: Weights::default(),
        }
    }
}

impl Config {
    /// Load from the resolved path, writing defaults if the file is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_create(&config_path())
    }

    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            debug!(path = %path.display(), "wrote default config");
            return Ok(config);
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            garbage_rows: self.garbage_rows,
            grant: GrantPolicy::new(self.grant_min, self.grant_max),
        }
    }

    /// Persisted state file: the override, else `<data dir>/focusblocks/state.json`.
    pub fn state_path(&self) -> PathBuf {
        match &self.state_path {
            Some(path) => path.clone(),
            None => data_dir().join(STATE_FILE),
        }
    }

    /// Log file, next to the state file.
    pub fn log_path(&self) -> PathBuf {
        let state = self.state_path();
        match state.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(LOG_FILE),
            _ => PathBuf::from(LOG_FILE),
        }
    }
}

/// Resolved config file location.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    match dirs::config_dir() {
        Some(dir) => dir.join("focusblocks").join("config.toml"),
        None => PathBuf::from(FALLBACK_CONFIG_PATH),
    }
}

fn data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("focusblocks"),
        None => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_lives_in_data_dir() {
        let config = Config::default();
        let state = config.state_path();
        assert!(state.ends_with("focusblocks/state.json") || state == Path::new("./state.json"));
        if let Some(dir) = dirs::data_dir() {
            assert_eq!(state, dir.join("focusblocks").join("state.json"));
        }
        assert_eq!(config.log_path(), state.with_file_name("focusblocks.log"));
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(600));
        assert_eq!(config.garbage_rows, 4);
        assert_eq!(config.session_config().grant, GrantPolicy::new(1, 3));
        assert!(config.seed.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("tick_ms = 250\nseed = 7\n[weights]\nimpact = 2.0\n").unwrap();
        assert_eq!(config.tick_ms, 250);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.weights.impact, 2.0);
        assert_eq!(config.weights.urgency, 1.0);
        assert_eq!(config.grant_max, 3);
    }

    #[test]
    fn inverted_grant_range_is_normalized() {
        let config = Config {
            grant_min: 5,
            grant_max: 2,
            ..Config::default()
        };
        assert_eq!(config.session_config().grant, GrantPolicy::new(5, 5));
    }

    #[test]
    fn state_override_moves_log() {
        let config = Config {
            state_path: Some(PathBuf::from("/tmp/fb/state.json")),
            ..Config::default()
        };
        assert_eq!(config.state_path(), PathBuf::from("/tmp/fb/state.json"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/fb/focusblocks.log"));
    }
}
