//! Configuration loading and typed config structures for Waypoint navigation.
//!
//! The canonical configuration lives in `waypoint-config.yaml` next to the
//! application. Every field has a default, so an empty file (or no file at
//! all, via [`NavigationConfig::default`]) is a valid configuration.

use std::path::Path;

use serde::Deserialize;
use waypoint_router::{DEFAULT_EVENT_CAPACITY, RouterOptions};

use crate::store::DEFAULT_CHANGE_CAPACITY;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level navigation configuration.
///
/// Mirrors the structure of `waypoint-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NavigationConfig {
    /// Route resolution settings.
    #[serde(default)]
    pub router: RouterSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Navigation store settings.
    #[serde(default)]
    pub store: StoreSettings,
}

impl NavigationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `WAYPOINT_LOG_LEVEL` overrides `logging.level`
    /// - `WAYPOINT_DEV_MODE` (`1`, `true`, `0`, `false`) overrides
    ///   `router.dev_mode`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `WAYPOINT_*` environment overrides to this configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("WAYPOINT_LOG_LEVEL").ok(),
            std::env::var("WAYPOINT_DEV_MODE").ok(),
        );
    }

    fn apply_overrides(&mut self, log_level: Option<String>, dev_mode: Option<String>) {
        if let Some(level) = log_level.filter(|level| !level.trim().is_empty()) {
            self.logging.level = level;
        }
        if let Some(dev_mode) = dev_mode.as_deref().and_then(parse_flag) {
            self.router.dev_mode = dev_mode;
        }
    }

    /// Router options derived from the `router` section.
    pub const fn router_options(&self) -> RouterOptions {
        RouterOptions {
            dev_mode: self.router.dev_mode,
            event_channel_capacity: self.router.event_channel_capacity,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Route resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouterSettings {
    /// Warn about non-serializable route parameters.
    #[serde(default = "default_dev_mode")]
    pub dev_mode: bool,

    /// Buffer size of each route's event channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            dev_mode: default_dev_mode(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Navigation store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreSettings {
    /// Buffer size of the state change channel.
    #[serde(default = "default_change_channel_capacity")]
    pub change_channel_capacity: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            change_channel_capacity: default_change_channel_capacity(),
        }
    }
}

const fn default_dev_mode() -> bool {
    cfg!(debug_assertions)
}

const fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_change_channel_capacity() -> usize {
    DEFAULT_CHANGE_CAPACITY
}
