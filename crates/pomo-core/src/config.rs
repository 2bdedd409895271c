//! User settings for pomo
//!
//! Read from `~/.config/pomo/config.json`. Every field is optional; a
//! missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading the settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Persistent user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Send a desktop notification when a session completes
    #[serde(default = "default_true")]
    pub notifications: bool,

    /// Ask the notification backend for an audible alert
    #[serde(default = "default_true")]
    pub sound: bool,

    /// Notification icon override
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Pause between the last session of a cycle and the next cycle
    #[serde(default = "default_restart_delay")]
    pub restart_delay_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_restart_delay() -> u64 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            sound: true,
            icon: None,
            restart_delay_secs: default_restart_delay(),
        }
    }
}

impl Settings {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }

    /// Load settings from `path`, falling back to defaults if it is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
