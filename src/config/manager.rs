//! Config manager for loading, saving, and atomic updates.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Section-level updates (only the modified section is changed)
//! - Missing fields filled with defaults on load

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages application configuration.
///
/// Handles loading, saving, and atomic section-level updates.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current settings loaded in memory.
    settings: Settings,
}

impl ConfigManager {
    /// Create a new config manager with the given config file path.
    ///
    /// Does not load the config - call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to the current settings.
    ///
    /// Changes made here are only in memory until `save()` or
    /// `update_section()` is called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load config from file.
    ///
    /// Returns an error if the file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load config from file, creating it with defaults if it doesn't exist.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            self.load()?;
        } else {
            if let Some(parent) = self.config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            self.settings = Settings::default();
            self.save()?;
        }
        Ok(())
    }

    /// Ensure all configured directories exist.
    ///
    /// Creates output, temp, and logs directories if they don't exist.
    /// Should be called after `load_or_create()`.
    pub fn ensure_dirs_exist(&self) -> ConfigResult<()> {
        let dirs = [
            &self.settings.paths.output_folder,
            &self.settings.paths.temp_root,
            &self.settings.paths.logs_folder,
        ];

        for dir in dirs {
            let path = PathBuf::from(dir);
            if !path.exists() {
                fs::create_dir_all(&path)?;
            }
        }

        Ok(())
    }

    /// Get the logs folder path.
    pub fn logs_folder(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.logs_folder)
    }

    /// Get the temp root path.
    pub fn temp_root(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.temp_root)
    }

    /// Save the entire config atomically.
    ///
    /// Writes to a temp file first, then renames to ensure an atomic write.
    pub fn save(&self) -> ConfigResult<()> {
        let content = toml::to_string_pretty(&self.settings)?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Update a specific section atomically.
    ///
    /// Re-reads the file from disk, updates only the specified section, and
    /// writes back atomically so unrelated sections keep their on-disk state.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let current_content = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = if current_content.is_empty() {
            DocumentMut::new()
        } else {
            current_content.parse()?
        };

        let section_toml = match section {
            ConfigSection::Paths => toml::to_string_pretty(&self.settings.paths)?,
            ConfigSection::Tools => toml::to_string_pretty(&self.settings.tools)?,
            ConfigSection::Processing => toml::to_string_pretty(&self.settings.processing)?,
            ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
        };

        let section_doc: DocumentMut = section_toml.parse()?;
        let section_table = section_doc.as_table().clone();

        doc[section.table_name()] = Item::Table(section_table);

        self.atomic_write(&doc.to_string())?;

        Ok(())
    }

    /// Write content to the config file atomically (temp file + rename).
    fn atomic_write(&self, content: &str) -> ConfigResult<()> {
        let temp_path = self.config_path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[paths]"));
        assert!(content.contains("[tools]"));
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();
        manager.settings_mut().tools.ffmpeg_path = "/custom/ffmpeg".to_string();
        manager.save().unwrap();

        let mut fresh = ConfigManager::new(&path);
        fresh.load().unwrap();
        assert_eq!(fresh.settings().tools.ffmpeg_path, "/custom/ffmpeg");
    }

    #[test]
    fn update_section_leaves_other_sections_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        // Change two sections in memory, persist only one
        manager.settings_mut().paths.output_folder = "elsewhere".to_string();
        manager.settings_mut().logging.compact = false;
        manager.update_section(ConfigSection::Logging).unwrap();

        let mut fresh = ConfigManager::new(&path);
        fresh.load().unwrap();
        assert!(!fresh.settings().logging.compact);
        // Paths section was not saved, so the on-disk default survives
        assert_eq!(fresh.settings().paths.output_folder, "frames_output");
    }

    #[test]
    fn ensure_dirs_creates_folders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();
        manager.settings_mut().paths.output_folder =
            dir.path().join("out").display().to_string();
        manager.settings_mut().paths.temp_root = dir.path().join("tmp").display().to_string();
        manager.settings_mut().paths.logs_folder = dir.path().join("logs").display().to_string();

        manager.ensure_dirs_exist().unwrap();
        assert!(dir.path().join("out").is_dir());
        assert!(dir.path().join("tmp").is_dir());
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn load_missing_file_errors() {
        let mut manager = ConfigManager::new("/nonexistent/dir/settings.toml");
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }
}
