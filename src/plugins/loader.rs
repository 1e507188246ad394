//! Plugin discovery and loading for slashdeck
//!
//! This module scans a plugins root for candidate directories, loads and
//! validates each candidate's `plugin.json`, and resolves the commands a
//! plugin exposes, either from the manifest or from the markdown files in
//! its `commands/` directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, SlashdeckError};

use super::frontmatter::parse_frontmatter;
use super::hint::parse_argument_hint;
use super::types::{
    CommandDefinition, CommandManifest, LoadedPlugin, PluginManifest, PluginMetadata,
};

/// Manifest location, relative to a plugin directory.
pub const MANIFEST_FILE: &str = "plugin.json";

/// Command prompt directory, relative to a plugin directory.
pub const COMMANDS_DIR: &str = "commands";

/// A candidate directory that could not be loaded.
#[derive(Debug, Clone)]
pub struct SkippedPlugin {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a full discovery pass over a plugins root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Successfully loaded plugins, in scan order.
    pub plugins: Vec<LoadedPlugin>,
    /// Candidates that failed to load, with the reason.
    pub skipped: Vec<SkippedPlugin>,
}

/// List the plugin candidates under `root`.
///
/// Returns the direct subdirectories of `root` sorted by name. Regular
/// files are ignored. A root that does not exist yields no candidates.
pub fn scan_plugin_dir(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        info!(dir = %root.display(), "Plugin directory does not exist, skipping");
        return Ok(Vec::new());
    }

    if !root.is_dir() {
        warn!(path = %root.display(), "Plugin path is not a directory, skipping");
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(root).map_err(|e| {
        SlashdeckError::Config(format!(
            "Failed to read plugin directory {}: {}",
            root.display(),
            e
        ))
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            SlashdeckError::Config(format!("Failed to read directory entry: {}", e))
        })?;

        let entry_path = entry.path();
        if entry_path.is_dir() {
            candidates.push(entry_path);
        }
    }

    candidates.sort();
    Ok(candidates)
}

/// Discover and load every plugin under `root`.
///
/// Each candidate is loaded independently: a candidate that fails to load
/// is logged, recorded in [`Discovery::skipped`], and the scan continues.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use slashdeck::plugins::discover_plugins;
///
/// let discovery = discover_plugins(Path::new("/home/user/.slashdeck/plugins")).unwrap();
/// for plugin in &discovery.plugins {
///     println!("Found plugin: {} v{}", plugin.id(), plugin.metadata.version);
/// }
/// ```
pub fn discover_plugins(root: &Path) -> Result<Discovery> {
    let mut discovery = Discovery::default();

    for candidate in scan_plugin_dir(root)? {
        match load_plugin(&candidate) {
            Ok(plugin) => {
                info!(
                    plugin = %plugin.id(),
                    version = %plugin.metadata.version,
                    commands = plugin.command_count(),
                    "Discovered plugin"
                );
                discovery.plugins.push(plugin);
            }
            Err(e) => {
                warn!(
                    dir = %candidate.display(),
                    error = %e,
                    "Failed to load plugin, skipping"
                );
                discovery.skipped.push(SkippedPlugin {
                    path: candidate,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(discovery)
}

/// Load a single plugin from its directory.
///
/// # Errors
/// - `SlashdeckError::InvalidManifest` if `plugin.json` is missing, fails
///   validation, or an auto-discovery plugin has no `commands/` directory
/// - `SlashdeckError::Json` if the manifest cannot be decoded
/// - `SlashdeckError::Io` if a manifest or prompt file cannot be read
pub fn load_plugin(dir: &Path) -> Result<LoadedPlugin> {
    let manifest_path = dir.join(MANIFEST_FILE);

    if !manifest_path.is_file() {
        return Err(SlashdeckError::InvalidManifest(format!(
            "No {} found in {}",
            MANIFEST_FILE,
            dir.display()
        )));
    }

    let content = fs::read_to_string(&manifest_path)?;
    let manifest: PluginManifest = serde_json::from_str(&content)?;

    validate_manifest(&manifest)?;

    if !is_addressable_name(manifest.key()) {
        return Err(SlashdeckError::InvalidManifest(format!(
            "Plugin id '{}' must not contain path separators, '..' or ':'",
            manifest.key()
        )));
    }

    let commands = if manifest.is_explicit() {
        resolve_explicit_commands(dir, manifest.key(), &manifest.commands)?
    } else {
        discover_commands(dir, manifest.key())?
    };

    Ok(LoadedPlugin::new(
        PluginMetadata::from_manifest(manifest, commands),
        dir.to_path_buf(),
    ))
}

/// Validate a decoded plugin manifest.
///
/// Checks that the registry key (`id` or `name`), `version` and
/// `description` are non-empty, and that every explicitly declared command
/// has a name. Key uniqueness is the registry's concern.
pub fn validate_manifest(manifest: &PluginManifest) -> Result<()> {
    let key = manifest.key();
    if key.trim().is_empty() {
        return Err(SlashdeckError::InvalidManifest(
            "Plugin must declare a non-empty name or id".to_string(),
        ));
    }

    if manifest.version.trim().is_empty() {
        return Err(SlashdeckError::InvalidManifest(format!(
            "Plugin '{}' has an empty version string",
            key
        )));
    }

    if manifest.description.trim().is_empty() {
        return Err(SlashdeckError::InvalidManifest(format!(
            "Plugin '{}' has an empty description",
            key
        )));
    }

    for (index, command) in manifest.commands.iter().enumerate() {
        if command.name.trim().is_empty() {
            return Err(SlashdeckError::InvalidManifest(format!(
                "Command #{} in plugin '{}' has an empty name",
                index + 1,
                key
            )));
        }
    }

    Ok(())
}

/// Whether `name` can form one segment of a `plugin:command` key and a
/// file name inside the plugin directory.
fn is_addressable_name(name: &str) -> bool {
    !name.contains(['/', '\\', ':']) && !name.contains("..")
}

/// Attach prompt text to manifest-declared commands.
///
/// The prompt comes from `commands/<name>.md` with any frontmatter header
/// removed; a missing file leaves the prompt empty.
///
/// # Errors
/// `SlashdeckError::InvalidManifest` if a command name contains a path
/// separator, `..` or `:`.
fn resolve_explicit_commands(
    dir: &Path,
    plugin_id: &str,
    declared: &[CommandManifest],
) -> Result<Vec<CommandDefinition>> {
    let commands_dir = dir.join(COMMANDS_DIR);

    declared
        .iter()
        .map(|command| -> Result<CommandDefinition> {
            if !is_addressable_name(&command.name) {
                warn!(plugin = %plugin_id, command = %command.name, "Rejecting unsafe command name");
                return Err(SlashdeckError::InvalidManifest(format!(
                    "Command '{}' in plugin '{}' must not contain path separators, '..' or ':'",
                    command.name, plugin_id
                )));
            }

            let prompt_path = commands_dir.join(format!("{}.md", command.name));
            let prompt = if prompt_path.is_file() {
                parse_frontmatter(&fs::read_to_string(&prompt_path)?).body
            } else {
                debug!(command = %command.name, path = %prompt_path.display(), "No prompt file");
                String::new()
            };

            Ok(CommandDefinition {
                name: command.name.clone(),
                description: command.description.clone(),
                prompt,
                parameters: command.parameters.clone(),
            })
        })
        .collect()
}

/// Build command definitions from every `.md` file in `commands/`.
fn discover_commands(dir: &Path, plugin_id: &str) -> Result<Vec<CommandDefinition>> {
    let commands_dir = dir.join(COMMANDS_DIR);
    if !commands_dir.is_dir() {
        return Err(SlashdeckError::InvalidManifest(format!(
            "Plugin '{}' declares no commands and has no {}/ directory",
            plugin_id, COMMANDS_DIR
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&commands_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort();

    let mut commands = Vec::with_capacity(files.len());
    for path in files {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!(path = %path.display(), "Skipping command file with non UTF-8 name");
            continue;
        };
        if !is_addressable_name(name) {
            warn!(plugin = %plugin_id, path = %path.display(), "Skipping command file with unaddressable name");
            continue;
        }

        let parsed = parse_frontmatter(&fs::read_to_string(&path)?);
        let description = match parsed.get("description") {
            Some(desc) if !desc.is_empty() => desc.to_string(),
            _ => fallback_description(name, &parsed.body),
        };
        let parameters = parse_argument_hint(parsed.get("argument-hint"));

        commands.push(CommandDefinition {
            name: name.to_string(),
            description,
            prompt: parsed.body,
            parameters,
        });
    }

    Ok(commands)
}

/// First non-empty body line without heading markers, else a generic label.
fn fallback_description(name: &str, body: &str) -> String {
    body.lines()
        .map(|line| line.trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Command {}", name))
}
