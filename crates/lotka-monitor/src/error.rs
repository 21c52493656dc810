//! Error types for the monitor binary.
//!
//! [`MonitorError`] is the top-level error type that wraps all possible
//! failure modes during startup and replay.

/// Top-level error for the monitor binary.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lotka_core::ConfigError,
    },

    /// The configured run parameters were rejected.
    #[error("invalid run parameters: {source}")]
    Validation {
        /// The underlying validation error.
        #[from]
        source: lotka_core::ValidationError,
    },

    /// Observer API server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: lotka_observer::StartupError,
    },

    /// The event source could not be opened or read.
    #[error("event source {path}: {source}")]
    Source {
        /// The configured source path (`-` for stdin).
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The ingest worker stopped before the replay finished.
    #[error("ingest worker stopped: {message}")]
    Ingest {
        /// Description of the failure.
        message: String,
    },
}

impl From<lotka_observer::ObserverError> for MonitorError {
    fn from(e: lotka_observer::ObserverError) -> Self {
        Self::Ingest {
            message: e.to_string(),
        }
    }
}
