//! Configuration module for uplog.
//!
//! Typed configuration structs that map to the YAML configuration file,
//! with loading, defaults, and the agent's default path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration for the uplog agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub buffer: BufferConfig,
    pub store: StoreConfig,
    pub sink: SinkConfig,
    pub logging: LoggingConfig,
}

/// Buffer / flush settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Seconds between automatic flush cycles.
    pub flush_interval: u64,
    /// Key under which the serialized queue mirror is stored.
    pub queue_key: String,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            flush_interval: 3600,
            queue_key: "uplog.queue".to_string(),
        }
    }
}

/// Local key-value store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the store's key files.
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("uplog"),
        }
    }
}

/// Remote crash-reporting backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Base URL of the reporting backend.
    pub base_url: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://reports.enigmora.com".to_string(),
        }
    }
}

/// Local logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Default config file path: `~/.config/uplog/config.yaml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("uplog")
            .join("config.yaml")
    }
}
