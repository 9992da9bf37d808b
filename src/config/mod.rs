//! User settings.
//!
//! Settings live in one JSON file. Lookup order: an explicit `--config`
//! path, then `$CHATMOD_CONFIG`, then `<config dir>/chatmod/settings.json`,
//! then built-in defaults.

pub mod settings;

pub use settings::{Settings, SettingsSource, CONFIG_ENV_VAR, DEFAULT_LOG_FILTER};
