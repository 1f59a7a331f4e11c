//! Error handling module for BreatheBreak.
//!
//! A single `thiserror` enum covers every failure the stores, the
//! controller and the CLI can report. Most of these never reach the user:
//! read failures fall back to defaults and write failures are logged.

use std::io;
use thiserror::Error;

/// Unified error type for BreatheBreak.
#[derive(Error, Debug)]
pub enum BreatheError {
    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stats file (JSON) errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Config file (TOML) parse errors
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config file (TOML) serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Rejected user input. The message is shown to the user as-is.
    #[error("{0}")]
    InvalidInput(String),

    /// Interrupt handler registration errors
    #[error("Failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Result type alias for BreatheBreak operations
pub type Result<T> = std::result::Result<T, BreatheError>;

impl BreatheError {
    /// Create a user input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        BreatheError::InvalidInput(msg.into())
    }
}
