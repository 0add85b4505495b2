//! Error types for ipck
//!
//! Only the capture step, snapshot I/O and configuration can fail. Diffing and
//! primary selection are total over their inputs and never return errors.
//! Underlying I/O and JSON errors are folded into a variant that names the
//! step and the file involved.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ipck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ipck
#[derive(Error, Debug)]
pub enum Error {
    /// The address capture mechanism could not be run
    #[error("Address capture error: {0}")]
    Capture(String),

    /// A snapshot file exists but cannot be decoded
    #[error("Corrupt snapshot {}: {message}", path.display())]
    CorruptState {
        /// Path of the offending file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Snapshot store errors (read, write, rename)
    #[error("Snapshot store error: {0}")]
    StateStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a capture error
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Create a corrupt-state error for `path`
    pub fn corrupt_state(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CorruptState {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a snapshot store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error was raised while validating configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
