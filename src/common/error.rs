//! Error types for the catalog test suite
//!
//! Assertion failures are the expected "error" signal of a scenario; every
//! other variant means the suite could not even make the observation.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the catalog test suite
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("{method} {path} failed: {source}")]
    Transport {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    // === Authentication Errors ===
    #[error("Authentication failed: {0}")]
    Auth(String),

    // === Assertion Errors ===
    #[error("{}", .0.join("; "))]
    Assertion(Vec<String>),

    #[error("{kind} with title '{title}' not found")]
    FixtureNotFound { kind: String, title: String },

    // === Scenario Errors ===
    #[error("Unknown scenario '{name}'. Available: {available}")]
    UnknownScenario { name: String, available: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === File Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a single-message assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(vec![message.into()])
    }

    /// Create a transport error for a request
    pub fn transport(method: &str, path: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            method: method.to_string(),
            path: path.to_string(),
            source,
        }
    }

    /// Create a fixture not found error
    pub fn fixture_not_found(kind: &str, title: &str) -> Self {
        Self::FixtureNotFound {
            kind: kind.to_string(),
            title: title.to_string(),
        }
    }

    /// Create an unknown scenario error listing the valid names
    pub fn unknown_scenario<S: AsRef<str>>(name: &str, available: &[S]) -> Self {
        Self::UnknownScenario {
            name: name.to_string(),
            available: available
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Whether this error came from a failed check rather than the environment
    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::Assertion(_) | Error::FixtureNotFound { .. })
    }
}
