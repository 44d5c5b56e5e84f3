//! Configuration
//!
//! Settings are read from a RON file. Every field has a default, so a file
//! only needs to mention what it changes.
//!
//! # Lookup order
//!
//! ```text
//! 1. --config PATH
//! 2. $COOPSCHED_CONFIG
//! 3. $XDG_CONFIG_HOME/coopsched/config.ron
//! 4. ~/.config/coopsched/config.ron  (%APPDATA%\coopsched\config.ron on Windows)
//! 5. Default values
//! ```
//!
//! # Example file
//!
//! ```text
//! (
//!     log: (level: debug),
//!     scheduler: (initial_capacity: 64, log_resumptions: false),
//!     search: (min_digits: [7, 9, 11]),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::scheduler::SchedulerConfig;
use crate::util::logger::LogLevel;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "COOPSCHED_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
}

/// Defaults for the bundled Lucas workloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Digit-length thresholds, one search task each.
    #[serde(default = "default_min_digits")]
    pub min_digits: Vec<u32>,
    /// How many Lucas numbers the primes workload examines.
    #[serde(default = "default_prime_count")]
    pub prime_count: usize,
}

fn default_min_digits() -> Vec<u32> {
    vec![7, 9]
}

fn default_prime_count() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_digits: default_min_digits(),
            prime_count: default_prime_count(),
        }
    }
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("coopsched"));
    }

    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("coopsched"));
    }

    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("coopsched"));
    }

    None
}

/// Get the default config file path
pub fn get_config_path() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    get_config_dir().map(|dir| dir.join("config.ron"))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is
/// tried and a missing file yields [`Config::default`].
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_config_file(path);
    }

    match get_config_path() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => Ok(Config::default()),
    }
}

/// Parse the config file at `path`.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse config from RON text.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(ron::from_str(content)?)
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save_config(
    config: &Config,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())?;
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] ron::Error),
}
