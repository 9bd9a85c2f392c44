//! Error types

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error while reading a settings file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are not usable
    #[error("validation error: {0}")]
    Validation(String),
}

/// Persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO error on the backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
