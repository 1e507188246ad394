//! Error types for slashdeck
//!
//! This module defines the error type shared by the plugin loader, the
//! command registry, the registry store and the marketplace orchestrator.
//! Uses `thiserror` for `Display` and `Error` implementations.

use thiserror::Error;

/// The primary error type for slashdeck operations.
#[derive(Error, Debug)]
pub enum SlashdeckError {
    /// Configuration errors (unreadable config file, bad override values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A plugin manifest is missing, undecodable or fails validation.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// No plugin is registered under the given id.
    #[error("Plugin not found: {0}")]
    NotFound(String),

    /// No command is registered under the given `plugin:command` key.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// The command exists but its owning plugin is disabled.
    #[error("Plugin '{0}' is disabled")]
    PluginDisabled(String),

    /// Writing the persisted registry failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for slashdeck operations.
pub type Result<T> = std::result::Result<T, SlashdeckError>;
