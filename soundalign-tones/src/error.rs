//! Error types for soundalign-tones
//!
//! None of these ever reach the end user directly: host-facing entry points
//! log them and fall back to silence or the plain tone.

use thiserror::Error;

/// Main error type for the tone engine
#[derive(Error, Debug)]
pub enum Error {
    /// Output device or driver missing, or the stream failed to open
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Malformed frequency, duration, percent or synthesis setting
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The device rejected a write during playback
    #[error("Stream write failure: {0}")]
    StreamWriteFailure(String),

    /// Progress tone requested while no output worker is running
    #[error("Output worker not running")]
    WorkerNotRunning,

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors from the shared settings/config crate
    #[error(transparent)]
    Common(#[from] soundalign_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using soundalign-tones Error
pub type Result<T> = std::result::Result<T, Error>;
