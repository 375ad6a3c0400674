//! Configuration management
//!
//! Handles loading and saving user preferences: the display locale and the
//! location of the key-value storage file.
//!
//! Configuration files are stored in platform-specific directories:
//! - macOS: `~/Library/Application Support/ttingchu/config.yaml`
//! - Linux: `~/.config/ttingchu/config.yaml`
//! - Windows: `%APPDATA%\ttingchu\config.yaml`

use crate::locale::Locale;
use crate::stores::{FileKeyValueStore, LocalStorage};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "ttingchu";
const STORAGE_FILE: &str = "storage.json";

/// Application configuration
///
/// Persisted as YAML in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Language for validation messages and formatted text
    #[serde(default)]
    pub locale: Locale,
    /// Storage file override; the platform data directory is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default config file location
    ///
    /// # Returns
    /// - `Ok(Config)` with the loaded configuration, or defaults if the file doesn't exist
    /// - `Err` if the file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = ?config_path, "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let config: Config =
            serde_yaml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Saves the configuration to the default config file location
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(self)?;
        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Returns the platform-specific configuration file path
    ///
    /// Falls back to `~/.config/ttingchu/config.yaml` if platform detection fails.
    ///
    /// # Errors
    /// Returns an error if the HOME environment variable is not set (fallback case only).
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            Ok(proj_dirs.config_dir().join("config.yaml"))
        } else {
            let home = std::env::var("HOME").context("HOME not set")?;
            Ok(PathBuf::from(home).join(".config/ttingchu/config.yaml"))
        }
    }

    /// Resolves the storage file, `None` when no data directory exists
    pub fn resolved_storage_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(|| {
            ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join(STORAGE_FILE))
        })
    }

    /// Opens the configured storage
    ///
    /// Without a resolvable storage location the returned storage is
    /// unavailable and silently ignores writes.
    pub fn open_storage(&self) -> Result<LocalStorage> {
        match self.resolved_storage_path() {
            Some(path) => {
                let store = FileKeyValueStore::open(&path)
                    .with_context(|| format!("Failed to open storage at {:?}", path))?;
                Ok(LocalStorage::new(store))
            }
            None => {
                tracing::warn!("no data directory available, storage disabled");
                Ok(LocalStorage::unavailable())
            }
        }
    }
}
