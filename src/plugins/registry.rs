//! Command registry for slashdeck
//!
//! This module provides the `PluginRegistry` struct, which holds loaded
//! plugins and indexes their commands under `pluginId:commandName` keys.
//! Collisions never fail registration: the later plugin or command wins,
//! and each collision is logged and reported back to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{Result, SlashdeckError};

use super::types::{CommandDefinition, LoadedPlugin};

/// Build the registry key for a plugin command.
pub fn command_key(plugin_id: &str, command_name: &str) -> String {
    format!("{}:{}", plugin_id, command_name)
}

/// An earlier registration that a later one replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collision {
    /// A plugin with the same id was already registered.
    Plugin {
        id: String,
        previous_path: PathBuf,
        path: PathBuf,
    },
    /// The same plugin declared a command name more than once.
    Command { key: String },
    /// A command key built by another plugin resolved to the same string.
    Key {
        key: String,
        previous_plugin: String,
        plugin: String,
    },
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collision::Plugin {
                id,
                previous_path,
                path,
            } => write!(
                f,
                "plugin '{}' from {} shadows {}",
                id,
                path.display(),
                previous_path.display()
            ),
            Collision::Command { key } => write!(f, "duplicate command '{}'", key),
            Collision::Key {
                key,
                previous_plugin,
                plugin,
            } => write!(
                f,
                "command key '{}' from plugin '{}' shadows plugin '{}'",
                key, plugin, previous_plugin
            ),
        }
    }
}

/// A command resolved through the registry, with its owning plugin.
#[derive(Debug, Clone, Copy)]
pub struct RegisteredCommand<'a> {
    pub key: &'a str,
    pub plugin: &'a LoadedPlugin,
    pub command: &'a CommandDefinition,
}

#[derive(Debug, Clone)]
struct CommandRef {
    plugin_id: String,
    index: usize,
}

/// A registry that holds loaded plugins and indexes their commands.
///
/// # Example
///
/// ```rust
/// use std::path::PathBuf;
/// use slashdeck::plugins::{
///     CommandDefinition, LoadedPlugin, PluginManifest, PluginMetadata, PluginRegistry,
/// };
///
/// let manifest: PluginManifest = serde_json::from_str(
///     r#"{ "name": "work", "version": "1.0.0", "description": "Work helpers" }"#,
/// ).unwrap();
/// let commands = vec![CommandDefinition {
///     name: "hello".to_string(),
///     description: "Greet".to_string(),
///     prompt: "Hi {{name}}".to_string(),
///     parameters: None,
/// }];
///
/// let mut registry = PluginRegistry::new();
/// registry.register(LoadedPlugin::new(
///     PluginMetadata::from_manifest(manifest, commands),
///     PathBuf::from("/tmp/work"),
/// ));
///
/// assert_eq!(registry.plugin_count(), 1);
/// assert!(registry.get("work:hello").is_some());
/// ```
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Plugin id to plugin instance.
    plugins: BTreeMap<String, LoadedPlugin>,

    /// Command key to the owning plugin and command position.
    commands: BTreeMap<String, CommandRef>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin and index its commands.
    ///
    /// A plugin whose id is already registered replaces the earlier one,
    /// including all of its command keys. Within one plugin, a repeated
    /// command name resolves to the last declaration. Every such
    /// replacement is returned as a [`Collision`].
    pub fn register(&mut self, plugin: LoadedPlugin) -> Vec<Collision> {
        let plugin_id = plugin.id().to_string();
        let mut collisions = Vec::new();

        if let Some(previous) = self.plugins.get(&plugin_id) {
            warn!(
                plugin = %plugin_id,
                previous = %previous.path.display(),
                replacement = %plugin.path.display(),
                "Plugin id collision, later plugin shadows earlier"
            );
            collisions.push(Collision::Plugin {
                id: plugin_id.clone(),
                previous_path: previous.path.clone(),
                path: plugin.path.clone(),
            });
            self.commands.retain(|_, r| r.plugin_id != plugin_id);
        }

        for (index, command) in plugin.metadata.commands.iter().enumerate() {
            let key = command_key(&plugin_id, &command.name);
            let reference = CommandRef {
                plugin_id: plugin_id.clone(),
                index,
            };
            match self.commands.insert(key.clone(), reference) {
                Some(previous) if previous.plugin_id == plugin_id => {
                    warn!(command = %key, "Duplicate command name, last declaration wins");
                    collisions.push(Collision::Command { key });
                }
                Some(previous) => {
                    warn!(
                        command = %key,
                        previous = %previous.plugin_id,
                        plugin = %plugin_id,
                        "Command key collision across plugins, later plugin shadows earlier"
                    );
                    collisions.push(Collision::Key {
                        key,
                        previous_plugin: previous.plugin_id,
                        plugin: plugin_id.clone(),
                    });
                }
                None => {}
            }
        }

        info!(
            plugin = %plugin_id,
            commands = plugin.command_count(),
            "Registered plugin"
        );

        self.plugins.insert(plugin_id, plugin);
        collisions
    }

    /// Look up a command by its `plugin:command` key.
    pub fn get(&self, key: &str) -> Option<RegisteredCommand<'_>> {
        let (key, reference) = self.commands.get_key_value(key)?;
        let plugin = self.plugins.get(&reference.plugin_id)?;
        let command = plugin.metadata.commands.get(reference.index)?;
        Some(RegisteredCommand {
            key: key.as_str(),
            plugin,
            command,
        })
    }

    /// All registered commands, ordered by key.
    pub fn all(&self) -> Vec<RegisteredCommand<'_>> {
        self.commands
            .keys()
            .filter_map(|key| self.get(key))
            .collect()
    }

    /// Set the enabled flag of a plugin.
    ///
    /// # Errors
    /// `SlashdeckError::NotFound` if no plugin has the given id.
    pub fn set_enabled(&mut self, plugin_id: &str, enabled: bool) -> Result<()> {
        let plugin = self
            .plugins
            .get_mut(plugin_id)
            .ok_or_else(|| SlashdeckError::NotFound(plugin_id.to_string()))?;
        plugin.enabled = enabled;
        Ok(())
    }

    pub fn get_plugin(&self, plugin_id: &str) -> Option<&LoadedPlugin> {
        self.plugins.get(plugin_id)
    }

    /// All registered plugins, ordered by id.
    pub fn list_plugins(&self) -> Vec<&LoadedPlugin> {
        self.plugins.values().collect()
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Number of addressable command keys.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Remove every plugin and command.
    pub fn clear(&mut self) {
        self.plugins.clear();
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::types::{PluginManifest, PluginMetadata};

    /// Helper to create a plugin with the given id and command names.
    fn make_plugin(id: &str, command_names: &[&str]) -> LoadedPlugin {
        let commands = command_names
            .iter()
            .map(|name| CommandDefinition {
                name: name.to_string(),
                description: format!("Command {}", name),
                prompt: format!("Run {}", name),
                parameters: None,
            })
            .collect();

        let manifest: PluginManifest = serde_json::from_str(&format!(
            r#"{{ "name": "{}", "version": "1.0.0", "description": "Plugin {}" }}"#,
            id, id
        ))
        .unwrap();

        LoadedPlugin::new(
            PluginMetadata::from_manifest(manifest, commands),
            PathBuf::from(format!("/tmp/{}", id)),
        )
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = PluginRegistry::new();
        assert_eq!(registry.plugin_count(), 0);
        assert_eq!(registry.command_count(), 0);
        assert!(registry.all().is_empty());
        assert!(registry.list_plugins().is_empty());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = PluginRegistry::new();
        let collisions = registry.register(make_plugin("git", &["status", "log"]));
        assert!(collisions.is_empty());

        let found = registry.get("git:log").unwrap();
        assert_eq!(found.key, "git:log");
        assert_eq!(found.plugin.id(), "git");
        assert_eq!(found.command.prompt, "Run log");

        assert!(registry.get("git:missing").is_none());
        assert!(registry.get("other:status").is_none());
        assert_eq!(registry.get_plugin("git").unwrap().command_count(), 2);
    }

    #[test]
    fn test_same_command_name_in_different_plugins() {
        let mut registry = PluginRegistry::new();
        registry.register(make_plugin("a", &["run"]));
        let collisions = registry.register(make_plugin("b", &["run"]));
        assert!(collisions.is_empty());
        assert_eq!(registry.command_count(), 2);
        assert_eq!(registry.get("a:run").unwrap().plugin.id(), "a");
        assert_eq!(registry.get("b:run").unwrap().plugin.id(), "b");
    }

    #[test]
    fn test_duplicate_plugin_id_last_wins() {
        let mut registry = PluginRegistry::new();
        registry.register(make_plugin("evolving", &["old"]));

        let mut replacement = make_plugin("evolving", &["new"]);
        replacement.path = PathBuf::from("/tmp/evolving-2");
        let collisions = registry.register(replacement);

        assert_eq!(
            collisions,
            vec![Collision::Plugin {
                id: "evolving".to_string(),
                previous_path: PathBuf::from("/tmp/evolving"),
                path: PathBuf::from("/tmp/evolving-2"),
            }]
        );
        assert_eq!(registry.plugin_count(), 1);
        assert!(registry.get("evolving:old").is_none());
        assert!(registry.get("evolving:new").is_some());
        assert_eq!(
            registry.get_plugin("evolving").unwrap().path,
            PathBuf::from("/tmp/evolving-2")
        );
    }

    #[test]
    fn test_duplicate_command_name_last_wins() {
        let mut registry = PluginRegistry::new();
        let mut plugin = make_plugin("p", &["dup", "dup"]);
        plugin.metadata.commands[1].prompt = "second".to_string();

        let collisions = registry.register(plugin);
        assert_eq!(
            collisions,
            vec![Collision::Command {
                key: "p:dup".to_string()
            }]
        );
        assert_eq!(registry.command_count(), 1);
        assert_eq!(registry.get("p:dup").unwrap().command.prompt, "second");
    }

    #[test]
    fn test_cross_plugin_key_clash_names_both_plugins() {
        let mut registry = PluginRegistry::new();
        registry.register(make_plugin("a:b", &["c"]));
        let collisions = registry.register(make_plugin("a", &["b:c"]));

        let expected = Collision::Key {
            key: "a:b:c".to_string(),
            previous_plugin: "a:b".to_string(),
            plugin: "a".to_string(),
        };
        assert_eq!(
            expected.to_string(),
            "command key 'a:b:c' from plugin 'a' shadows plugin 'a:b'"
        );
        assert_eq!(collisions, vec![expected]);
        assert_eq!(registry.get("a:b:c").unwrap().plugin.id(), "a");
    }

    #[test]
    fn test_all_is_ordered_by_key() {
        let mut registry = PluginRegistry::new();
        registry.register(make_plugin("zeta", &["b", "a"]));
        registry.register(make_plugin("alpha", &["x"]));

        let keys: Vec<&str> = registry.all().iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["alpha:x", "zeta:a", "zeta:b"]);
    }

    #[test]
    fn test_set_enabled() {
        let mut registry = PluginRegistry::new();
        registry.register(make_plugin("p", &["c"]));

        registry.set_enabled("p", false).unwrap();
        assert!(!registry.get_plugin("p").unwrap().enabled);
        assert!(!registry.get("p:c").unwrap().plugin.enabled);

        registry.set_enabled("p", true).unwrap();
        assert!(registry.get_plugin("p").unwrap().enabled);
    }

    #[test]
    fn test_set_enabled_unknown_plugin() {
        let mut registry = PluginRegistry::new();
        let err = registry.set_enabled("ghost", true).unwrap_err();
        assert!(matches!(err, SlashdeckError::NotFound(id) if id == "ghost"));
    }

    #[test]
    fn test_clear() {
        let mut registry = PluginRegistry::new();
        registry.register(make_plugin("p", &["c"]));
        registry.clear();
        assert_eq!(registry.plugin_count(), 0);
        assert_eq!(registry.command_count(), 0);
    }

    #[test]
    fn test_collision_display() {
        let collision = Collision::Command {
            key: "p:dup".to_string(),
        };
        assert_eq!(collision.to_string(), "duplicate command 'p:dup'");
    }

    #[test]
    fn test_command_key() {
        assert_eq!(command_key("work", "hello"), "work:hello");
    }
}
