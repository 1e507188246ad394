//! slashdeck - plugin discovery and slash command registry

pub mod config;
pub mod error;
pub mod marketplace;
pub mod plugins;

pub use config::Config;
pub use error::{Result, SlashdeckError};
pub use marketplace::{InitReport, Marketplace, MarketplaceStats};
