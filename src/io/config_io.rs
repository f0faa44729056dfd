//! Layered configuration: command line > environment > config.toml >
//! built-in defaults. The environment layer is handled by clap (`env`
//! attributes on the flags), so by the time values reach this module they
//! arrive together as `ConfigOverrides`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{Config, ConfigFile, ConfigOverrides};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `~/.config/ticklist` (platform equivalent)
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ticklist"))
}

/// Load and resolve the configuration.
///
/// An explicit `--config` path must exist; the default location is
/// optional.
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let config_dir = default_config_dir();
    let file = match &overrides.config_path {
        Some(path) => read_config_file(path)?,
        None => match config_dir.as_ref().map(|d| d.join("config.toml")) {
            Some(path) if path.exists() => read_config_file(&path)?,
            _ => ConfigFile::default(),
        },
    };
    Ok(resolve(&file, overrides, config_dir.as_deref()))
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge the layers. Priority: overrides > file > defaults.
pub fn resolve(file: &ConfigFile, overrides: &ConfigOverrides, config_dir: Option<&Path>) -> Config {
    let defaults = Config::default();
    Config {
        api_url: overrides
            .api_url
            .clone()
            .or_else(|| file.api.base_url.clone())
            .unwrap_or(defaults.api_url),
        timeout_secs: file.api.timeout_secs.unwrap_or(defaults.timeout_secs),
        token_file: file
            .api
            .token_file
            .clone()
            .or_else(|| config_dir.map(|d| d.join("token"))),
        token: overrides.token.clone().filter(|t| !t.trim().is_empty()),
        log_level: overrides
            .log_level
            .clone()
            .or_else(|| file.log.level.clone())
            .unwrap_or(defaults.log_level),
        log_file: file.log.file.clone(),
        ui_colors: file.ui.colors.clone(),
    }
}
