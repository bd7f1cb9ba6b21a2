//! # Configuration Utilities
//!
//! TOML configuration shared by the `stego` CLI and the web server. Every
//! field has a default, so a missing section or an empty file is valid.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [web]
//! address = "0.0.0.0:3000"
//! max_upload_bytes = 20971520
//! ```

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("config/stego.toml")?;
/// ```
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub logging: LoggingConfig,
    pub web: WebConfig,
}

impl StegoConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.level))
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address (e.g., "127.0.0.1:3000")
    pub address: String,
    /// Largest accepted multipart request body
    pub max_upload_bytes: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
