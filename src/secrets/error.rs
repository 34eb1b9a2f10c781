//! Error types for backend reader operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for backend reads.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Failures raised by a backend while fetching chain bytes.
///
/// Absence is not an error at this layer: readers return `Ok(None)` and the
/// resolver decides what a missing value means.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Reading from the filesystem failed for a reason other than "not found".
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be parsed.
    #[error("Failed to parse {what}: {reason}")]
    Parse { what: String, reason: String },

    /// An encrypted value could not be decrypted or failed authentication.
    #[error("Decryption failed: {reason}")]
    Decryption { reason: String },

    /// Vault returned an error other than "not found".
    #[error("Vault request failed: {message}")]
    Vault { message: String },

    /// The backend was invoked with incomplete settings.
    #[error("Backend configuration error: {message}")]
    Config { message: String },
}

impl BackendError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn parse(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse { what: what.into(), reason: reason.into() }
    }

    pub fn decryption(reason: impl Into<String>) -> Self {
        Self::Decryption { reason: reason.into() }
    }

    pub fn vault(message: impl Into<String>) -> Self {
        Self::Vault { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}
