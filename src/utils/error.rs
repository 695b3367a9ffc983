//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading a HiTrack log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Failed to read log: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Shorthand for building a `MalformedRecord`
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Errors raised when an input name cannot be decoded
#[derive(Error, Debug)]
pub enum FilenameError {
    #[error("Not an original HiTrack_ file: {0}")]
    InvalidFilename(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}
