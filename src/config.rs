//! Configuration loading and management.

use crate::board::query::ViewMode;
use crate::format::OutputFormat;
use crate::persistence::DEFAULT_STORAGE_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where the board is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Key the board record is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".jobtrackr/board.db")
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Output defaults for the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub view: ViewMode,
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Candidate config files, highest priority first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".jobtrackr/config.yaml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".jobtrackr").join("config.yaml"));
        }
        paths
    }

    /// Load from `explicit` if given (errors are fatal), else from the first
    /// existing default location, else defaults. Environment overrides apply
    /// last.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::search_paths()
                .into_iter()
                .find(|p| p.exists())
                .map(|p| {
                    debug!(path = %p.display(), "Using config file");
                    Self::load(&p)
                })
                .transpose()?
                .unwrap_or_default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply `JOBTRACKR_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("JOBTRACKR_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }

        if let Some(key) = lookup("JOBTRACKR_STORAGE_KEY") {
            if !key.trim().is_empty() {
                self.storage.storage_key = key;
            }
        }

        if let Some(format) = lookup("JOBTRACKR_FORMAT") {
            if let Some(format) = OutputFormat::from_str(&format) {
                self.display.format = format;
            }
        }
    }
}
