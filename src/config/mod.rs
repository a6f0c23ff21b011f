//! Configuration management for esdump
//!
//! This module handles loading, parsing, and managing configuration:
//! - Configuration files (TOML format)
//! - Command-line argument (config file path only)
//!
//! The configuration file is organized into named groups (e.g. `[store]`,
//! `[export]`) purely for the operator's benefit. The loader flattens all
//! groups into a single lookup table keyed by option name; a duplicate
//! option name across groups overwrites the earlier value (last group
//! wins) and is reported with a warning.
//!
//! Configuration precedence (highest to lowest):
//! 1. Explicit config file path from the command line
//! 2. `./esdump.toml` in the working directory
//! 3. `~/.esdump/config.toml`
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::utils;

/// Resolved export settings.
///
/// Constructed once at startup, immutable thereafter, shared read-only
/// by all export workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Store host name
    #[serde(default = "default_host")]
    pub host: String,

    /// Store port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root output directory for export artifacts
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Number of documents requested per scroll page
    #[serde(default = "default_size")]
    pub size: u32,

    /// Scroll cursor lifetime, as a duration string (e.g. "2m")
    #[serde(default = "default_scroll")]
    pub scroll: String,

    /// Number of concurrent index export workers
    #[serde(default = "default_workers")]
    pub workers: usize,
}

// Default value functions
fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9200
}

fn default_directory() -> PathBuf {
    PathBuf::from("exports")
}

fn default_size() -> u32 {
    1000
}

fn default_scroll() -> String {
    "2m".to_string()
}

fn default_workers() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            directory: default_directory(),
            size: default_size(),
            scroll: default_scroll(),
            workers: default_workers(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration, resolving the file location
    ///
    /// An explicit path must exist; without one, the working-directory
    /// file and then the home-directory file are tried before falling
    /// back to defaults.
    ///
    /// # Arguments
    /// * `path` - Explicit config file path, if given on the command line
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Self::from_file(path);
        }

        for candidate in [PathBuf::from("esdump.toml"), Self::default_path()] {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string, flattening option groups
    ///
    /// # Arguments
    /// * `raw` - TOML document text
    ///
    /// # Returns
    /// * `Result<Config>` - Parsed configuration or error
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let table: toml::Table = raw
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::InvalidFormat(e.to_string()))?;

        let flat = flatten_groups(table);

        toml::Value::Table(flat)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".esdump")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField("host".to_string()).into());
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workers".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        humantime::parse_duration(&self.scroll).map_err(|_| ConfigError::InvalidValue {
            field: "scroll".to_string(),
            value: self.scroll.clone(),
        })?;
        Ok(())
    }

    /// The store endpoint as `host:port`
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL for store requests
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Directory that receives this endpoint's artifacts
    ///
    /// Scoped under the output root so repeated runs against different
    /// stores do not collide.
    pub fn export_root(&self) -> PathBuf {
        self.directory
            .join(utils::string::sanitize_component(&self.endpoint()))
    }

    /// Scroll cursor lifetime as a Duration
    ///
    /// Only meaningful after [`Config::validate`] has accepted the value.
    pub fn scroll_ttl(&self) -> Duration {
        humantime::parse_duration(&self.scroll).unwrap_or(Duration::from_secs(120))
    }
}

/// Flatten grouped options into a single lookup table
///
/// Groups are merged in document order; a key appearing in more than one
/// group keeps the last value seen and emits a warning.
fn flatten_groups(table: toml::Table) -> toml::Table {
    let mut flat = toml::Table::new();

    for (group, value) in table {
        match value {
            toml::Value::Table(options) => {
                for (key, option) in options {
                    if flat.contains_key(&key) {
                        warn!(
                            "Option '{}' in group '{}' overrides a value from an earlier group",
                            key, group
                        );
                    }
                    flat.insert(key, option);
                }
            }
            // Ungrouped top-level options are taken as-is
            other => {
                if flat.contains_key(&group) {
                    warn!("Top-level option '{}' overrides a value from an earlier group", group);
                }
                flat.insert(group, other);
            }
        }
    }

    flat
}
