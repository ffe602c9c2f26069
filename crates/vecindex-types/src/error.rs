//! Error types for configuration handling.

use thiserror::Error;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// Settings loaded but hold an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
