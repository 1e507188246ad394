//! Configuration for slashdeck
//!
//! Configuration lives in `~/.slashdeck/config.json`. Every field is
//! optional; a missing file means defaults. Environment variables override
//! file values:
//!
//! | Variable                  | Field                    |
//! |---------------------------|--------------------------|
//! | `SLASHDECK_PLUGINS_DIR`   | `plugins.plugins_dir`    |
//! | `SLASHDECK_REGISTRY_PATH` | `plugins.registry_path`  |
//! | `SLASHDECK_RESTORE_STATE` | `plugins.restore_state`  |
//!
//! ```json
//! {
//!   "plugins": {
//!     "plugins_dir": "~/.slashdeck/plugins",
//!     "registry_path": "~/.slashdeck/registry.json",
//!     "restore_state": true,
//!     "blocked_plugins": ["experimental"]
//!   }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SlashdeckError};
use crate::plugins::PluginConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plugins: PluginConfig,
}

impl Config {
    /// The slashdeck home directory (`~/.slashdeck`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".slashdeck")
    }

    /// Default configuration file path.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load configuration from the default path, then apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::path())?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SlashdeckError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SlashdeckError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply `SLASHDECK_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("SLASHDECK_PLUGINS_DIR").filter(|v| !v.trim().is_empty()) {
            self.plugins.plugins_dir = dir;
        }
        if let Some(path) = lookup("SLASHDECK_REGISTRY_PATH").filter(|v| !v.trim().is_empty()) {
            self.plugins.registry_path = path;
        }
        if let Some(raw) = lookup("SLASHDECK_RESTORE_STATE") {
            match parse_bool(&raw) {
                Some(value) => self.plugins.restore_state = value,
                None => warn!(value = %raw, "Ignoring invalid SLASHDECK_RESTORE_STATE"),
            }
        }
    }

    /// Resolved plugins root.
    pub fn plugins_dir(&self) -> PathBuf {
        expand_home(&self.plugins.plugins_dir)
    }

    /// Resolved registry file path.
    pub fn registry_path(&self) -> PathBuf {
        expand_home(&self.plugins.registry_path)
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    if path == "~" {
        return home();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home().join(rest),
        None => PathBuf::from(path),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
