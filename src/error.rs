//! Error types for the runner core
//!
//! Only I/O-facing code (settings, theme files, high score files) is
//! fallible. The simulation itself never returns errors: invalid actions are
//! ignored and drifting counters are clamped.

use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Main error type
#[derive(Error, Debug)]
pub enum RunnerError {
    /// File read/write failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Theme data that parses but cannot drive a session
    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    /// Persistence collaborator unavailable
    #[error("storage unavailable: {0}")]
    Storage(String),
}

impl RunnerError {
    pub fn invalid_theme(msg: impl Into<String>) -> Self {
        Self::InvalidTheme(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
