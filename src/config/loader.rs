use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/commander/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("commander").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Principal ids are unique
    /// - The console executor, if set, is in the configured roster
    /// - The live suggestion limit is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        for principal in &self.principals {
            if !ids.insert(principal.id) {
                return Err(ConfigError::ValidationError {
                    message: format!("Duplicate principal id {}", principal.id),
                });
            }
        }

        // An empty roster means the console seeds its own.
        let executor = self.console.executor.as_ref().filter(|_| !self.principals.is_empty());
        if let Some(executor) = executor {
            let known = self
                .principals
                .iter()
                .any(|p| p.display_name.eq_ignore_ascii_case(executor));
            if !known {
                return Err(ConfigError::ValidationError {
                    message: format!("Console executor '{}' not found in principals", executor),
                });
            }
        }

        if self.dispatch.live_suggestion_limit == 0 {
            return Err(ConfigError::ValidationError {
                message: "live_suggestion_limit must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
