//! Application configuration
//!
//! Read once from `config.toml` in the data directory at process
//! start and treated as immutable afterwards. A missing file is not
//! an error; every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings loaded from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Deck whose due cards take over the whole queue while any
    /// remain. Unset means no deck blocks.
    pub blocking_deck: Option<Uuid>,
    /// Override for the collection database path
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("mneme"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Path of the config file under a data directory
    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Load configuration from the data directory, falling back to
    /// defaults when no config file exists
    pub fn load(data_dir: &Path) -> Result<Config> {
        let path = Self::config_path(data_dir);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the collection database path
    pub fn collection_path(&self, data_dir: &Path) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| data_dir.join("collection.db"))
    }
}
