//! Plugin types for slashdeck
//!
//! This module defines the types used by the plugin system: the manifest
//! structures decoded from `plugin.json`, the validated metadata and command
//! definitions built by the loader, the runtime plugin representation, and
//! the plugin section of the configuration.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a command parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
    File,
    Directory,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::File => "file",
            ParameterType::Directory => "directory",
        };
        f.write_str(s)
    }
}

/// One declared input of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandParameter {
    /// Parameter name, referenced as `{{name}}` in the prompt.
    pub name: String,

    /// Declared type. Defaults to `string`.
    #[serde(rename = "type", default)]
    pub param_type: ParameterType,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Whether the caller is expected to supply a value.
    #[serde(default)]
    pub required: bool,

    /// Value substituted when the caller supplies none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl CommandParameter {
    /// Render the declared default as substitution text.
    ///
    /// String defaults are used verbatim; other JSON values use their JSON
    /// text (`3`, `true`). A `null` default counts as no default.
    pub fn default_text(&self) -> Option<String> {
        match self.default.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A command entry as written in an explicit `plugin.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandManifest {
    /// Command name, unique within the plugin.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<CommandParameter>>,
}

/// The manifest decoded from a plugin's `plugin.json` file.
///
/// Required string fields default to empty so that a missing field reaches
/// [`validate_manifest`](super::validate_manifest) and is reported by name
/// instead of as a generic decode error. Type mismatches (for example a
/// `commands` value that is not an array) still fail the decode.
///
/// # Example
///
/// ```json
/// {
///   "name": "work",
///   "version": "1.2.0",
///   "description": "Everyday work helpers",
///   "author": "Jane Doe",
///   "tags": ["productivity"],
///   "commands": [
///     {
///       "name": "hello",
///       "description": "Greet someone",
///       "parameters": [
///         { "name": "name", "type": "string", "description": "Who", "required": false, "default": "friend" }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Explicit registry key. Falls back to `name` when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    /// Semantic version string (e.g., "1.0.0").
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Hand-authored commands. Empty selects auto-discovery from `commands/`.
    #[serde(default)]
    pub commands: Vec<CommandManifest>,
}

impl PluginManifest {
    /// The registry key: `id` when set, otherwise `name`.
    pub fn key(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => &self.name,
        }
    }

    /// Whether this manifest declares its commands explicitly.
    pub fn is_explicit(&self) -> bool {
        !self.commands.is_empty()
    }
}

/// One invocable unit of a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    /// Opaque prompt text; may contain `{{name}}` placeholders.
    pub prompt: String,
    /// `None` when the command never declared parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<CommandParameter>>,
}

impl CommandDefinition {
    /// Declared parameters, empty when none were declared.
    pub fn parameters(&self) -> &[CommandParameter] {
        self.parameters.as_deref().unwrap_or(&[])
    }
}

/// Validated identity and commands of one plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Unique registry key.
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub commands: Vec<CommandDefinition>,
}

impl PluginMetadata {
    /// Build metadata from a validated manifest and its resolved commands.
    pub fn from_manifest(manifest: PluginManifest, commands: Vec<CommandDefinition>) -> Self {
        Self {
            id: manifest.key().to_string(),
            name: manifest.name,
            version: manifest.version,
            description: manifest.description,
            author: manifest.author,
            repository: manifest.repository,
            license: manifest.license,
            tags: manifest.tags,
            commands,
        }
    }
}

/// A loaded plugin with its metadata, filesystem path, and enabled state.
#[derive(Debug, Clone)]
pub struct LoadedPlugin {
    pub metadata: PluginMetadata,

    /// The directory the plugin was loaded from.
    pub path: PathBuf,

    pub enabled: bool,
}

impl LoadedPlugin {
    /// Create a new plugin from metadata and path, enabled by default.
    pub fn new(metadata: PluginMetadata, path: PathBuf) -> Self {
        Self {
            metadata,
            path,
            enabled: true,
        }
    }

    /// The plugin's registry key.
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn command_count(&self) -> usize {
        self.metadata.commands.len()
    }

    /// Find a command by name. With duplicate names the last one wins.
    pub fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.metadata.commands.iter().rev().find(|c| c.name == name)
    }
}

/// Plugin system configuration, stored in the `plugins` section of
/// `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Root directory whose subdirectories are plugin candidates.
    pub plugins_dir: String,

    /// Location of the persisted registry summary.
    pub registry_path: String,

    /// Re-apply persisted enabled flags on initialization.
    pub restore_state: bool,

    /// Plugin ids that are never registered.
    pub blocked_plugins: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugins_dir: "~/.slashdeck/plugins".to_string(),
            registry_path: "~/.slashdeck/registry.json".to_string(),
            restore_state: true,
            blocked_plugins: Vec::new(),
        }
    }
}
