//! Configuration file handling
//!
//! A single JSON object:
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "storage_key": "dailyUpdates",
//!   "max_attachments": 5,
//!   "max_attachment_bytes": 5242880,
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::{IngestConfig, DEFAULT_MAX_FILE_BYTES};
use crate::observability::Severity;
use crate::schema::MAX_IMAGES;
use crate::store::DEFAULT_STORAGE_KEY;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: PathBuf,

    /// Backend key holding the collection (default "dailyUpdates")
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Attachments per record, 1..=5 (default 5)
    #[serde(default = "default_max_attachments")]
    pub max_attachments: usize,

    /// Per-file attachment size limit (default 5 MiB)
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,

    /// trace | info | warn | error (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_max_attachments() -> usize {
    MAX_IMAGES
}
fn default_max_attachment_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Defaults around a data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            storage_key: default_storage_key(),
            max_attachments: default_max_attachments(),
            max_attachment_bytes: default_max_attachment_bytes(),
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from a file.
    ///
    /// A relative `data_dir` is resolved against the config file's directory.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Write a default config (`data_dir` = `data` next to the file) to
    /// `path`, then load it back.
    pub fn write_default(path: &Path) -> ConfigResult<Self> {
        let io_err = |e: std::io::Error| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(&Self::with_data_dir("data"))
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, body).map_err(io_err)?;

        Self::load(path)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }

        if self.max_attachments == 0 || self.max_attachments > MAX_IMAGES {
            return Err(ConfigError::Invalid(format!(
                "max_attachments must be between 1 and {}, got {}",
                MAX_IMAGES, self.max_attachments
            )));
        }

        if self.max_attachment_bytes == 0 {
            return Err(ConfigError::Invalid("max_attachment_bytes must be > 0".into()));
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed log threshold
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            max_attachments: self.max_attachments,
            max_file_bytes: self.max_attachment_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("dailylog.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_applied() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{"data_dir": "data"}"#);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, temp.path().join("data"));
        assert_eq!(config.storage_key, "dailyUpdates");
        assert_eq!(config.max_attachments, 5);
        assert_eq!(config.max_attachment_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.severity().unwrap(), Severity::Info);
    }

    #[test]
    fn test_absolute_data_dir_kept() {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("abs");
        let body = serde_json::json!({ "data_dir": data }).to_string();
        let path = write_config(&temp, &body);
        assert_eq!(Config::load(&path).unwrap().data_dir, data);
    }

    #[test]
    fn test_missing_data_dir_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"{"storage_key": "x"}"#);
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_attachment_limit_range() {
        let mut config = Config::with_data_dir("/tmp/x");
        config.max_attachments = 6;
        assert!(config.validate().is_err());
        config.max_attachments = 0;
        assert!(config.validate().is_err());
        config.max_attachments = 3;
        assert!(config.validate().is_ok());
        assert_eq!(config.ingest_config().max_attachments, 3);
    }

    #[test]
    fn test_bad_log_level() {
        let mut config = Config::with_data_dir("/tmp/x");
        config.log_level = "loud".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_write_default_resolves_next_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("conf/dailylog.json");

        let config = Config::write_default(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.data_dir, temp.path().join("conf/data"));
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
