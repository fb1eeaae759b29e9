//! Error types for the tiles control layer
use thiserror::Error;

/// Control layer errors
#[derive(Error, Debug)]
pub enum TilesError {
    /// OSC encoding or decoding error
    #[error("OSC error: {0}")]
    OscError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Argument type tag does not agree with its value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid message format
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Result type for control operations
pub type Result<T> = std::result::Result<T, TilesError>;
