//! Centralized error types for smtpcap.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the smtpcap library.
///
/// Parsing itself never fails on malformed mail; these cover the few
/// operations that touch the outside world.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The random source could not produce bytes for a message identifier.
    #[error("Random source failed: {0}")]
    RandomSource(#[from] rand::Error),

    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified input file does not exist.
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),

    /// The configuration file could not be parsed.
    #[error("Invalid configuration in '{path}': {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

/// Convenience alias for `Result<T, CaptureError>`.
pub type Result<T> = std::result::Result<T, CaptureError>;

impl CaptureError {
    /// Create an `Io` variant from a path and an `io::Error`.
    ///
    /// `NotFound` is mapped to [`CaptureError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound(path);
        }
        Self::Io { path, source }
    }
}
