//! Error types for core module
//!
//! Provides custom error types for core functionality, currently limited to
//! loading and validating [`SessionConfig`](super::SessionConfig) files.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Config file I/O error
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config serialization/deserialization error
    #[error("Config serialization error: {0}")]
    ConfigSerialization(#[from] serde_json::Error),

    /// A config value is outside its accepted range
    #[error("Invalid config value for `{field}`: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
