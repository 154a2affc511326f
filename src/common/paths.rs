//! Configuration file locations
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/catalog-e2e/`
//! - macOS: `~/Library/Application Support/catalog-e2e/`
//! - Windows: `%APPDATA%\catalog-e2e\`

use std::path::PathBuf;

const APP_NAME: &str = "catalog-e2e";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the default fixtures override file
pub fn fixtures_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("fixtures.yaml"))
}
