//! Marketplace orchestrator.
//!
//! `Marketplace` owns the command registry and the registry store and
//! drives the plugin lifecycle: scan and load the plugins root, register
//! every loaded plugin, persist the summary, then answer queries and
//! enable/disable requests.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, SlashdeckError};
use crate::plugins::{
    discover_plugins, render_prompt, Collision, FileRegistryStore, LoadedPlugin,
    PersistedRegistry, PluginRegistry, RegisteredCommand, RegistryStore, SkippedPlugin,
};

/// Outcome of [`Marketplace::initialize`].
#[derive(Debug, Default)]
pub struct InitReport {
    /// Plugins in the registry after initialization.
    pub loaded: usize,
    /// Candidates that failed to load.
    pub skipped: Vec<SkippedPlugin>,
    /// Plugin ids excluded by the blocklist.
    pub blocked: Vec<String>,
    /// Registrations that replaced an earlier one.
    pub collisions: Vec<Collision>,
}

/// Registry counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MarketplaceStats {
    pub total_plugins: usize,
    pub enabled_plugins: usize,
    pub disabled_plugins: usize,
    /// Addressable command keys across all plugins.
    pub total_commands: usize,
    /// Command keys whose plugin is enabled.
    pub available_commands: usize,
}

/// Plugin marketplace over one plugins root and one registry store.
pub struct Marketplace<S: RegistryStore = FileRegistryStore> {
    plugins_dir: PathBuf,
    registry: PluginRegistry,
    store: S,
    restore_state: bool,
    blocked_plugins: Vec<String>,
}

impl Marketplace<FileRegistryStore> {
    /// Build a marketplace from configuration, persisting to the
    /// configured registry file.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.plugins_dir(),
            FileRegistryStore::new(config.registry_path()),
        )
        .with_restore_state(config.plugins.restore_state)
        .with_blocked_plugins(config.plugins.blocked_plugins.clone())
    }
}

impl<S: RegistryStore> Marketplace<S> {
    /// Create a marketplace that restores persisted state and blocks nothing.
    pub fn new(plugins_dir: impl Into<PathBuf>, store: S) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            registry: PluginRegistry::new(),
            store,
            restore_state: true,
            blocked_plugins: Vec::new(),
        }
    }

    /// Whether `initialize` re-applies persisted enabled flags.
    pub fn with_restore_state(mut self, restore: bool) -> Self {
        self.restore_state = restore;
        self
    }

    /// Plugin ids that are never registered.
    pub fn with_blocked_plugins(mut self, blocked: Vec<String>) -> Self {
        self.blocked_plugins = blocked;
        self
    }

    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Scan, load, register and persist.
    ///
    /// Any previous registry contents are discarded. Candidates that fail
    /// to load are reported, not fatal. Fails only if the plugins root
    /// cannot be listed or the summary cannot be written.
    pub fn initialize(&mut self) -> Result<InitReport> {
        self.registry.clear();

        let discovery = discover_plugins(&self.plugins_dir)?;
        let persisted = if self.restore_state {
            Some(self.store.load())
        } else {
            None
        };

        let mut report = InitReport {
            skipped: discovery.skipped,
            ..Default::default()
        };

        for mut plugin in discovery.plugins {
            if self.blocked_plugins.iter().any(|b| b == plugin.id()) {
                info!(plugin = %plugin.id(), "Plugin is blocked, not registering");
                report.blocked.push(plugin.id().to_string());
                continue;
            }
            if let Some(enabled) = persisted
                .as_ref()
                .and_then(|p| p.enabled_state(plugin.id()))
            {
                plugin.enabled = enabled;
            }
            report.collisions.extend(self.registry.register(plugin));
        }

        self.persist()?;

        report.loaded = self.registry.plugin_count();
        info!(
            dir = %self.plugins_dir.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            commands = self.registry.command_count(),
            "Marketplace initialized"
        );
        Ok(report)
    }

    /// All registered plugins, ordered by id.
    pub fn list_plugins(&self) -> Vec<&LoadedPlugin> {
        self.registry.list_plugins()
    }

    /// Commands of enabled plugins, ordered by key.
    pub fn slash_commands(&self) -> Vec<RegisteredCommand<'_>> {
        self.registry
            .all()
            .into_iter()
            .filter(|c| c.plugin.enabled)
            .collect()
    }

    pub fn get_plugin(&self, plugin_id: &str) -> Option<&LoadedPlugin> {
        self.registry.get_plugin(plugin_id)
    }

    pub fn stats(&self) -> MarketplaceStats {
        let plugins = self.registry.list_plugins();
        let enabled_plugins = plugins.iter().filter(|p| p.enabled).count();
        let commands = self.registry.all();
        let available_commands = commands.iter().filter(|c| c.plugin.enabled).count();

        MarketplaceStats {
            total_plugins: plugins.len(),
            enabled_plugins,
            disabled_plugins: plugins.len() - enabled_plugins,
            total_commands: commands.len(),
            available_commands,
        }
    }

    /// Enable or disable a plugin and persist the change.
    ///
    /// # Errors
    /// - `SlashdeckError::NotFound` for an unknown id; nothing is written
    /// - `SlashdeckError::Persistence` if the summary cannot be written; the
    ///   in-memory flag is rolled back
    pub fn set_plugin_enabled(&mut self, plugin_id: &str, enabled: bool) -> Result<()> {
        let previous = self
            .registry
            .get_plugin(plugin_id)
            .map(|p| p.enabled)
            .ok_or_else(|| SlashdeckError::NotFound(plugin_id.to_string()))?;

        self.registry.set_enabled(plugin_id, enabled)?;
        if let Err(e) = self.persist() {
            self.registry.set_enabled(plugin_id, previous)?;
            return Err(e);
        }

        info!(plugin = %plugin_id, enabled, "Plugin state changed");
        Ok(())
    }

    /// Resolve a command and substitute positional arguments into its
    /// prompt. The prompt is returned, not run.
    ///
    /// # Errors
    /// - `SlashdeckError::CommandNotFound` for an unknown key
    /// - `SlashdeckError::PluginDisabled` if the owning plugin is disabled
    pub fn execute_command(&self, key: &str, args: &[String]) -> Result<String> {
        let found = self
            .registry
            .get(key)
            .ok_or_else(|| SlashdeckError::CommandNotFound(key.to_string()))?;

        if !found.plugin.enabled {
            return Err(SlashdeckError::PluginDisabled(found.plugin.id().to_string()));
        }

        Ok(render_prompt(
            &found.command.prompt,
            found.command.parameters(),
            args,
        ))
    }

    fn persist(&self) -> Result<()> {
        let summary = PersistedRegistry::from_plugins(self.registry.list_plugins(), Utc::now());
        self.store.save(&summary)
    }
}
