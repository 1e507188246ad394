//! Plugin system for slashdeck
//!
//! A plugin is a directory containing a `plugin.json` manifest and,
//! optionally, markdown prompt files under `commands/`. Each command is
//! addressed as `<plugin id>:<command name>`.
//!
//! # Architecture
//!
//! - **types**: Manifest structures, validated metadata, `LoadedPlugin`, `PluginConfig`
//! - **loader**: Candidate scanning, manifest validation, command resolution
//! - **frontmatter** / **hint**: Prompt file header and argument-hint parsing
//! - **registry**: `pluginId:commandName` index with last-writer-wins collisions
//! - **store**: Persisted registry summary
//! - **template**: Positional `{{parameter}}` substitution
//!
//! # Plugin Directory Structure
//!
//! ```text
//! ~/.slashdeck/plugins/
//! ├── work/
//! │   ├── plugin.json          # explicit "commands" array
//! │   └── commands/
//! │       └── hello.md
//! └── review/
//!     ├── plugin.json          # no "commands": auto-discovered
//!     └── commands/
//!         └── file.md
//! ```
//!
//! # Example command file
//!
//! ```markdown
//! ---
//! description: Review a file
//! argument-hint: [file] [depth]
//! ---
//! Review {{file}} and report issues up to depth {{depth}}.
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use slashdeck::plugins::{discover_plugins, PluginRegistry};
//!
//! let discovery = discover_plugins(Path::new("/home/user/.slashdeck/plugins")).unwrap();
//!
//! let mut registry = PluginRegistry::new();
//! for plugin in discovery.plugins {
//!     registry.register(plugin);
//! }
//!
//! println!("Loaded {} plugins with {} commands", registry.plugin_count(), registry.command_count());
//! ```

mod frontmatter;
mod hint;
mod loader;
pub mod registry;
pub mod store;
mod template;
pub mod types;

pub use frontmatter::{parse_frontmatter, Frontmatter};
pub use hint::parse_argument_hint;
pub use loader::{
    discover_plugins, load_plugin, scan_plugin_dir, validate_manifest, Discovery, SkippedPlugin,
    COMMANDS_DIR, MANIFEST_FILE,
};
pub use registry::{command_key, Collision, PluginRegistry, RegisteredCommand};
#[cfg(test)]
pub use store::MockRegistryStore;
pub use store::{
    FileRegistryStore, PersistedRegistry, PluginSummary, RegistryStore, REGISTRY_FORMAT_VERSION,
};
pub use template::render_prompt;
pub use types::{
    CommandDefinition, CommandManifest, CommandParameter, LoadedPlugin, ParameterType,
    PluginConfig, PluginManifest, PluginMetadata,
};
