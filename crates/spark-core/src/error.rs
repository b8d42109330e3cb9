//! Error types for Spark
//!
//! Simulation and rendering never fail. Errors only surface at the edges:
//! loading and validating configuration.

use thiserror::Error;

/// The main error type for Spark operations
#[derive(Debug, Error)]
pub enum SparkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Invalid profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}

/// Result type alias for Spark operations
pub type Result<T> = std::result::Result<T, SparkError>;

impl From<toml::de::Error> for SparkError {
    fn from(err: toml::de::Error) -> Self {
        SparkError::TomlParseError(err.to_string())
    }
}

impl SparkError {
    pub fn invalid_profile(name: &str, reason: impl Into<String>) -> Self {
        SparkError::InvalidProfile {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
