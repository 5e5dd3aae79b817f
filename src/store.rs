//! Persisted user state (JSON): tasks, weights, inventory and reward tallies.
//!
//! The running game is never saved; every launch starts a fresh board.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::Profile;
use crate::types::Weights;

const STORE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file i/o: {0}")]
    Io(#[from] io::Error),
    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("state file version {found} is newer than this build understands")]
    UnsupportedVersion { found: u32 },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    version: u32,
    #[serde(flatten)]
    profile: Profile,
}

/// JSON-backed profile storage at a fixed path
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved profile. A missing file yields an empty profile with
    /// `default_weights`.
    pub fn load(&self, default_weights: Weights) -> Result<Profile, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved state");
            return Ok(Profile {
                weights: default_weights,
                ..Profile::default()
            });
        }
        let contents = fs::read_to_string(&self.path)?;
        let stored: StoredState = serde_json::from_str(&contents)?;
        if stored.version > STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: stored.version,
            });
        }
        debug!(tasks = stored.profile.tasks.len(), "state loaded");
        Ok(stored.profile)
    }

    /// Write the profile atomically (temp file, then rename).
    pub fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let stored = StoredState {
            version: STORE_VERSION,
            profile: profile.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            warn!(%err, "rename failed, writing state in place");
            let _ = fs::remove_file(&tmp);
            fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        }
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}
