//! Configuration loading and typed config structures for the monitor.
//!
//! The canonical configuration lives in `lotka-config.yaml` at the project
//! root. Every section and field has a default, so an empty file (or no
//! file) describes the classic rabbits-and-wolves run served on port 8080.

use std::path::Path;

use lotka_types::{SimulationParameters, SpeciesSet};
use serde::Deserialize;

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

    /// An environment override held an unusable value.
    #[error("invalid value for {var}: {message}")]
    Env {
        /// The environment variable name.
        var: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level monitor configuration.
///
/// Mirrors the structure of `lotka-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonitorConfig {
    /// Parameters of the run to start.
    #[serde(default)]
    pub simulation: SimulationParameters,

    /// Species tracked by the session, in chart order.
    #[serde(default)]
    pub species: SpeciesSet,

    /// Observer HTTP server settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Where inbound events are read from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `LOTKA_OBSERVER_HOST` overrides `observer.host`
    /// - `LOTKA_OBSERVER_PORT` overrides `observer.port`
    /// - `LOTKA_EVENT_SOURCE` overrides `source.path`
    /// - `LOTKA_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Env`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Env`] if an override cannot be parsed.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_yaml(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `LOTKA_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `LOTKA_OBSERVER_PORT` is not a port
    /// number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("LOTKA_OBSERVER_HOST") {
            self.observer.host = val;
        }
        if let Ok(val) = std::env::var("LOTKA_OBSERVER_PORT") {
            self.observer.port = val.parse().map_err(|e| ConfigError::Env {
                var: "LOTKA_OBSERVER_PORT",
                message: format!("{val:?}: {e}"),
            })?;
        }
        if let Ok(val) = std::env::var("LOTKA_EVENT_SOURCE") {
            self.source.path = val;
        }
        if let Ok(val) = std::env::var("LOTKA_LOG_LEVEL") {
            self.logging.level = val;
        }
        Ok(())
    }
}

/// Observer HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Address to bind.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Inbound event source settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// Path to a JSON-lines event file, or `-` for standard input.
    #[serde(default = "default_source_path")]
    pub path: String,

    /// Keep serving the finished session until Ctrl-C once the source is
    /// exhausted.
    #[serde(default)]
    pub linger: bool,
}

impl SourceConfig {
    /// Whether events come from standard input.
    pub fn is_stdin(&self) -> bool {
        self.path == "-"
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            linger: false,
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_source_path() -> String {
    "-".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
