//! Settings loading and validation errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or validating [`Settings`](crate::config::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for the settings schema.
    #[error("failed to parse settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A field holds a value outside its allowed range.
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// No per-user config directory exists on this platform.
    #[error("could not determine the user config directory")]
    NoConfigDir,
}

impl ConfigError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO",
            ConfigError::Parse { .. } => "CONFIG_PARSE",
            ConfigError::Invalid { .. } => "CONFIG_INVALID",
            ConfigError::NoConfigDir => "CONFIG_NO_DIR",
        }
    }
}
