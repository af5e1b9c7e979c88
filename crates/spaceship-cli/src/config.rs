//! Configuration management for the CLI
//!
//! Configuration is read from the first file found in:
//! - the path given with `--config` / `SPACESHIP_CONFIG`
//! - `.spaceship.yaml`, `.spaceship.json`, `spaceship.yaml`, `spaceship.json`
//!   in the working directory
//! - `<user config dir>/spaceship/config.{yaml,json}`
//!
//! and falls back to defaults when none exists.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use spaceship_core::{RegistrarSettings, TimeoutConfig};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Account credentials used when neither flags nor the params file set them
    pub api: ApiConfig,

    /// Request timeouts
    pub timeouts: TimeoutSettings,

    /// Treat a failed nameserver assignment after registration as an error
    pub strict_nameservers: bool,

    /// Log request and response payloads
    pub debug: bool,

    /// Logging settings
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub key: Option<String>,
    pub secret: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub connect_secs: u64,
    pub request_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Console format (compact, full, json)
    pub format: Option<String>,

    /// JSON lines log file
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".spaceship.yaml"),
            PathBuf::from(".spaceship.json"),
            PathBuf::from("spaceship.yaml"),
            PathBuf::from("spaceship.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("spaceship");
            paths.push(dir.join("config.yaml"));
            paths.push(dir.join("config.json"));
        }

        paths
    }

    /// Orchestrator settings for one invocation
    pub fn registrar_settings(&self, debug_flag: bool, strict_flag: bool) -> RegistrarSettings {
        RegistrarSettings {
            timeouts: TimeoutConfig::from_secs(
                self.timeouts.connect_secs,
                self.timeouts.request_secs,
            ),
            debug: self.debug || debug_flag,
            strict_nameservers: self.strict_nameservers || strict_flag,
        }
    }
}

/// Whether a path names a YAML file
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}
