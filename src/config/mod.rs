//! Configuration management for Anime Frame Extractor.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed section is modified)
//! - Defaults applied for missing fields on load
//!
//! # Example
//!
//! ```no_run
//! use afe_core::config::{ConfigManager, ConfigSection};
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Output folder: {}", config.settings().paths.output_folder);
//!
//! // Modify a setting and save just its section atomically
//! config.settings_mut().logging.compact = false;
//! config.update_section(ConfigSection::Logging).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, PathSettings, ProcessingSettings, Settings, ToolSettings,
};
