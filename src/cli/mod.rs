//! Command handlers for the slashdeck binary.
//!
//! Each handler maps onto one `Marketplace` call and prints plain text to
//! stdout. Formatting lives in small `format_*` functions so it can be
//! tested without capturing output.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

use slashdeck::config::Config;
use slashdeck::marketplace::{Marketplace, MarketplaceStats};
use slashdeck::plugins::{LoadedPlugin, RegisteredCommand};

/// Load configuration and apply command-line path overrides.
pub(crate) fn load_config(
    plugins_dir: Option<PathBuf>,
    registry: Option<PathBuf>,
) -> Result<Config> {
    let mut config = Config::load().with_context(|| "Failed to load configuration")?;
    if let Some(dir) = plugins_dir {
        config.plugins.plugins_dir = dir.to_string_lossy().to_string();
    }
    if let Some(path) = registry {
        config.plugins.registry_path = path.to_string_lossy().to_string();
    }
    Ok(config)
}

/// Build and initialize the marketplace for one CLI invocation.
pub(crate) fn open_marketplace(config: &Config) -> Result<Marketplace> {
    let mut market = Marketplace::from_config(config);
    let report = market.initialize().with_context(|| {
        format!(
            "Failed to initialize plugins from {}",
            config.plugins_dir().display()
        )
    })?;
    for skipped in &report.skipped {
        eprintln!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    for collision in &report.collisions {
        eprintln!("Warning: {}", collision);
    }
    Ok(market)
}

pub(crate) fn cmd_list(market: &Marketplace) -> Result<()> {
    let plugins = market.list_plugins();
    if plugins.is_empty() {
        println!("No plugins installed in {}", market.plugins_dir().display());
        return Ok(());
    }
    for plugin in plugins {
        println!("{}", format_plugin_line(plugin));
    }
    Ok(())
}

pub(crate) fn cmd_commands(market: &Marketplace) -> Result<()> {
    let commands = market.slash_commands();
    if commands.is_empty() {
        println!("No commands available");
        return Ok(());
    }
    for command in commands {
        println!("{}", format_command_line(&command));
    }
    Ok(())
}

pub(crate) fn cmd_stats(market: &Marketplace) -> Result<()> {
    print!("{}", format_stats(&market.stats()));
    Ok(())
}

pub(crate) fn cmd_set_enabled(market: &mut Marketplace, id: &str, enabled: bool) -> Result<()> {
    market
        .set_plugin_enabled(id, enabled)
        .with_context(|| format!("Failed to update plugin '{}'", id))?;
    println!("Plugin '{}' {}", id, status_label(enabled));
    Ok(())
}

pub(crate) fn cmd_info(market: &Marketplace, id: &str) -> Result<()> {
    let plugin = market
        .get_plugin(id)
        .with_context(|| format!("Plugin '{}' not found", id))?;
    print!("{}", format_plugin_info(plugin));
    Ok(())
}

pub(crate) fn cmd_exec(market: &Marketplace, key: &str, args: &[String]) -> Result<()> {
    let prompt = market.execute_command(key, args)?;
    println!("{}", prompt);
    Ok(())
}

fn status_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

fn format_plugin_line(plugin: &LoadedPlugin) -> String {
    format!(
        "{} v{} [{}] - {} ({} commands)",
        plugin.id(),
        plugin.metadata.version,
        status_label(plugin.enabled),
        plugin.metadata.description,
        plugin.command_count()
    )
}

fn format_command_line(command: &RegisteredCommand<'_>) -> String {
    let hint: Vec<String> = command
        .command
        .parameters()
        .iter()
        .map(|p| {
            if p.required {
                format!("<{}>", p.name)
            } else {
                format!("[{}]", p.name)
            }
        })
        .collect();

    let mut line = format!("/{}", command.key);
    if !hint.is_empty() {
        line.push(' ');
        line.push_str(&hint.join(" "));
    }
    if !command.command.description.is_empty() {
        line.push_str(" - ");
        line.push_str(&command.command.description);
    }
    line
}

fn format_stats(stats: &MarketplaceStats) -> String {
    format!(
        "Plugins:  {} total, {} enabled, {} disabled\nCommands: {} total, {} available\n",
        stats.total_plugins,
        stats.enabled_plugins,
        stats.disabled_plugins,
        stats.total_commands,
        stats.available_commands
    )
}

fn format_plugin_info(plugin: &LoadedPlugin) -> String {
    let meta = &plugin.metadata;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", meta.name, meta.id);
    let _ = writeln!(out, "  Version:     {}", meta.version);
    let _ = writeln!(out, "  Status:      {}", status_label(plugin.enabled));
    let _ = writeln!(out, "  Description: {}", meta.description);
    if let Some(author) = &meta.author {
        let _ = writeln!(out, "  Author:      {}", author);
    }
    if let Some(repository) = &meta.repository {
        let _ = writeln!(out, "  Repository:  {}", repository);
    }
    if let Some(license) = &meta.license {
        let _ = writeln!(out, "  License:     {}", license);
    }
    if !meta.tags.is_empty() {
        let _ = writeln!(out, "  Tags:        {}", meta.tags.join(", "));
    }
    let _ = writeln!(out, "  Path:        {}", plugin.path.display());
    let _ = writeln!(out, "  Commands:");
    if meta.commands.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    for command in &meta.commands {
        let _ = writeln!(out, "    {} - {}", command.name, command.description);
        for param in command.parameters() {
            let _ = writeln!(
                out,
                "      {} ({}{}): {}",
                param.name,
                param.param_type,
                if param.required { ", required" } else { "" },
                param.description
            );
        }
    }
    out
}
