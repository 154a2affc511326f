//! Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Environment variable overriding `service.base_url`
pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
/// Environment variable overriding `auth.email`
pub const ENV_EMAIL: &str = "CATALOG_EMAIL";
/// Environment variable overriding `auth.password`
pub const ENV_PASSWORD: &str = "CATALOG_PASSWORD";
/// Environment variable supplying a pre-issued bearer token
pub const ENV_TOKEN: &str = "CATALOG_TOKEN";

const REDACTED: &str = "<redacted>";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Catalog service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Credentials and login settings
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Catalog service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Base URL all endpoint paths are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout; the transport default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3030/api".to_string()
}

/// Credentials and login settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Login email of the test user
    #[serde(default = "default_email")]
    pub email: String,

    /// Login password of the test user
    #[serde(default = "default_password")]
    pub password: String,

    /// Path of the login endpoint, relative to the base URL
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// JSON field of the login response holding the token
    #[serde(default = "default_token_field")]
    pub token_field: String,

    /// Pre-issued token; skips the login call when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email: default_email(),
            password: default_password(),
            login_path: default_login_path(),
            token_field: default_token_field(),
            token: None,
        }
    }
}

fn default_email() -> String {
    "john.doe@example.com".to_string()
}
fn default_password() -> String {
    "password123".to_string()
}
fn default_login_path() -> String {
    "user/login".to_string()
}
fn default_token_field() -> String {
    "accessToken".to_string()
}

impl Config {
    /// Load configuration and apply environment overrides
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// used when present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Overlay values from the environment
    ///
    /// Empty variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            self.service.base_url = url;
        }
        if let Some(email) = get(ENV_EMAIL) {
            self.auth.email = email;
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.auth.password = password;
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.auth.token = Some(token);
        }
    }

    /// Render the configuration as TOML with secrets masked
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        shown.auth.password = REDACTED.to_string();
        if shown.auth.token.is_some() {
            shown.auth.token = Some(REDACTED.to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| Error::Internal(e.to_string()))
    }
}
