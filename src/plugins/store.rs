//! Persisted registry summary.
//!
//! The summary records, per plugin, its id, enabled flag and the version
//! that was installed when the summary was written. It is always rebuilt in
//! full from the live plugin set and overwrites the previous file.
//!
//! # File format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "plugins": [
//!     { "id": "work", "enabled": true, "installedVersion": "1.2.0" }
//!   ],
//!   "lastUpdated": "2026-01-01T00:00:00Z"
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, SlashdeckError};

use super::types::LoadedPlugin;

/// Format version written into every summary.
pub const REGISTRY_FORMAT_VERSION: &str = "1.0.0";

/// Persisted state of one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    pub id: String,
    pub enabled: bool,
    pub installed_version: String,
}

/// The persisted registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRegistry {
    pub version: String,
    #[serde(default)]
    pub plugins: Vec<PluginSummary>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for PersistedRegistry {
    fn default() -> Self {
        Self {
            version: REGISTRY_FORMAT_VERSION.to_string(),
            plugins: Vec::new(),
            last_updated: None,
        }
    }
}

impl PersistedRegistry {
    /// Summarize a live plugin set.
    pub fn from_plugins<'a>(
        plugins: impl IntoIterator<Item = &'a LoadedPlugin>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            version: REGISTRY_FORMAT_VERSION.to_string(),
            plugins: plugins
                .into_iter()
                .map(|plugin| PluginSummary {
                    id: plugin.id().to_string(),
                    enabled: plugin.enabled,
                    installed_version: plugin.metadata.version.clone(),
                })
                .collect(),
            last_updated: Some(now),
        }
    }

    /// The persisted enabled flag for a plugin, if it was recorded.
    pub fn enabled_state(&self, plugin_id: &str) -> Option<bool> {
        self.plugins
            .iter()
            .find(|summary| summary.id == plugin_id)
            .map(|summary| summary.enabled)
    }
}

/// Durable storage for the registry summary.
#[cfg_attr(test, mockall::automock)]
pub trait RegistryStore {
    /// Read the stored summary. Missing or unreadable storage yields the
    /// empty default.
    fn load(&self) -> PersistedRegistry;

    /// Replace the stored summary.
    fn save(&self, registry: &PersistedRegistry) -> Result<()>;
}

/// JSON file backed [`RegistryStore`].
///
/// Writes go to a temporary file in the target directory which is then
/// renamed over the target, so readers never observe a partial file.
#[derive(Debug, Clone)]
pub struct FileRegistryStore {
    path: PathBuf,
}

impl FileRegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, e: impl std::fmt::Display) -> SlashdeckError {
        SlashdeckError::Persistence(format!("Failed to write {}: {}", self.path.display(), e))
    }
}

impl RegistryStore for FileRegistryStore {
    fn load(&self) -> PersistedRegistry {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No persisted registry, starting fresh");
            return PersistedRegistry::default();
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<PersistedRegistry>(&content) {
                Ok(registry) => {
                    debug!(
                        path = %self.path.display(),
                        plugins = registry.plugins.len(),
                        "Loaded persisted registry"
                    );
                    registry
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Failed to parse persisted registry, starting fresh");
                    PersistedRegistry::default()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read persisted registry");
                PersistedRegistry::default()
            }
        }
    }

    fn save(&self, registry: &PersistedRegistry) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.persistence_error(e))?;

        let json = serde_json::to_string_pretty(registry)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.persistence_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.persistence_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.persistence_error(e.error))?;

        debug!(
            path = %self.path.display(),
            plugins = registry.plugins.len(),
            "Saved persisted registry"
        );
        Ok(())
    }
}
