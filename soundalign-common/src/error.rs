//! Common error types for SoundAlign

use thiserror::Error;

/// Common result type for SoundAlign operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the SoundAlign crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings record could not be parsed
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// Invalid user input or setting value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
