//! Settings file loading, validation and persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::click::ClickConfig;
use crate::error::ConfigError;
use crate::refresh::RefreshConfig;

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "CHATMOD_CONFIG";

/// Log filter used when neither the settings nor `RUST_LOG` set one.
pub const DEFAULT_LOG_FILTER: &str = "chatmod=info";

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Where the active settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// `--config <path>`
    Explicit(PathBuf),
    /// `$CHATMOD_CONFIG`
    Env(PathBuf),
    /// The per-user settings file
    UserFile(PathBuf),
    /// No file; built-in defaults
    Defaults,
}

impl SettingsSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SettingsSource::Explicit(path)
            | SettingsSource::Env(path)
            | SettingsSource::UserFile(path) => Some(path),
            SettingsSource::Defaults => None,
        }
    }
}

/// All user settings.
///
/// Every field has a default, so a settings file only needs the values it
/// changes.
///
/// # Example
///
/// ```ignore
/// use chatmod::config::Settings;
///
/// let (settings, source) = Settings::resolve(cli_path.as_deref())?;
/// tracing::info!("Loaded settings from {:?}", source);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub click: ClickConfig,
    pub refresh: RefreshConfig,
    /// `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            click: ClickConfig::default(),
            refresh: RefreshConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    pub fn with_click(mut self, click: ClickConfig) -> Self {
        self.click = click;
        self
    }

    pub fn with_refresh(mut self, refresh: RefreshConfig) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Path of the per-user settings file.
    pub fn user_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("chatmod").join("settings.json"))
    }

    /// Read, parse and validate a settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Find and load the active settings.
    ///
    /// An explicit or `$CHATMOD_CONFIG` path must exist. The per-user file
    /// is optional: when it is missing, defaults are used.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, SettingsSource), ConfigError> {
        if let Some(path) = explicit {
            let settings = Self::load(path)?;
            return Ok((settings, SettingsSource::Explicit(path.to_path_buf())));
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
            let path = PathBuf::from(path);
            let settings = Self::load(&path)?;
            return Ok((settings, SettingsSource::Env(path)));
        }

        match Self::user_path() {
            Ok(path) if path.exists() => {
                let settings = Self::load(&path)?;
                Ok((settings, SettingsSource::UserFile(path)))
            }
            Ok(_) => Ok((Self::default(), SettingsSource::Defaults)),
            Err(err) => {
                tracing::debug!("No user settings file: {}", err);
                Ok((Self::default(), SettingsSource::Defaults))
            }
        }
    }

    /// Write the settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = self.to_json_pretty().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_error)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.click.validate()?;
        self.refresh.validate()?;
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log_filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
