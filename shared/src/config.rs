//! Configuration persistence utilities
//!
//! Provides functions for loading and saving page configuration to disk.

use directories::ProjectDirs;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("could not determine config directory")]
    NoConfigDir,
    /// IO error while reading/writing config
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Get the base configuration directory for all pages
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "ultion", "pages").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the configuration file path for a specific page
pub fn config_path(page_name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", page_name)))
}

/// Load configuration for a specific page
///
/// Returns `None` if the config file doesn't exist yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_config<T: DeserializeOwned>(page_name: &str) -> Result<Option<T>, ConfigError> {
    let path = config_path(page_name).ok_or(ConfigError::NoConfigDir)?;

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let config: T = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Save configuration for a specific page
pub fn save_config<T: Serialize>(page_name: &str, config: &T) -> Result<(), ConfigError> {
    let path = config_path(page_name).ok_or(ConfigError::NoConfigDir)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(&path, contents)?;
    debug!("saved config to {}", path.display());
    Ok(())
}

/// Delete configuration for a specific page
pub fn delete_config(page_name: &str) -> Result<(), ConfigError> {
    let path = config_path(page_name).ok_or(ConfigError::NoConfigDir)?;

    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CarouselSettings;

    #[test]
    fn test_config_path() {
        // Headless CI boxes may have no home directory at all
        if let Some(path) = config_path("test_page") {
            assert!(path.to_string_lossy().ends_with("test_page.toml"));
        }
    }

    #[test]
    fn test_settings_survive_toml() {
        let mut settings = CarouselSettings::default();
        settings.motion.idle_speed = 0.01;
        settings.geometry.mobile_breakpoint_px = 720.0;

        let text = toml::to_string_pretty(&settings).unwrap();
        let back: CarouselSettings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_parse_error_maps() {
        let err: ConfigError = toml::from_str::<CarouselSettings>("motion = 3")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
