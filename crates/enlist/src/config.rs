//! Configuration management for enlist.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::{ExportOptions, ExportTimezone, DEFAULT_DATE_FORMAT, EXPORT_FILE_NAME};
use crate::store::ReadPolicy;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "enlist";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "registrations.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ENLIST_`, `__` between levels)
/// 2. TOML config file at `~/.config/enlist/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Which record store backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable `SQLite` database.
    #[default]
    Sqlite,
    /// Process-local memory. Nothing survives exit.
    Memory,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store backend.
    pub backend: StorageBackend,
    /// Path to the database file.
    /// Defaults to `~/.local/share/enlist/registrations.db`
    pub database_path: Option<PathBuf>,
    /// What to do when stored records cannot be decoded.
    pub read_policy: ReadPolicy,
    /// How long a writer waits for another writer's lock, in milliseconds.
    pub busy_timeout_ms: u64,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when no output path is given.
    pub file_name: String,
    /// `strftime` format for the Registered column.
    pub date_format: String,
    /// Time zone the Registered date is rendered in.
    pub timezone: ExportTimezone,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_path: None, // Will be resolved to default at runtime
            read_policy: ReadPolicy::Lenient,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timezone: ExportTimezone::Local,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ENLIST_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ENLIST_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.busy_timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "busy_timeout_ms must be greater than 0".to_string(),
            });
        }

        if self.export.file_name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "export file_name cannot be empty".to_string(),
            });
        }

        if self.export.date_format.is_empty()
            || StrftimeItems::new(&self.export.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(Error::ConfigValidation {
                message: format!("invalid date_format: {:?}", self.export.date_format),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the busy timeout as a Duration.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.storage.busy_timeout_ms)
    }

    /// Export options derived from the `[export]` section.
    #[must_use]
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            date_format: self.export.date_format.clone(),
            timezone: self.export.timezone,
        }
    }
}
