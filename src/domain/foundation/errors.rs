//! Error types for the domain layer.
//!
//! The client distinguishes three failure families:
//!
//! - [`AuthError`](super::AuthError) - credential and provider failures
//! - [`BackendError`] - metrics backend unreachable, rejecting, or returning
//!   a payload we cannot interpret
//! - [`StorageError`] - local persistence failures
//!
//! None of them is fatal. Callers degrade to local state wherever a fallback
//! exists and surface the error otherwise.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }
}

/// Errors returned by the metrics backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend could not be reached (connect, timeout, TLS).
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The backend answered but the payload was malformed.
    #[error("Malformed backend payload: {0}")]
    Data(String),
}

impl BackendError {
    /// Creates a data error with a message.
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// Returns true if the failure happened before the backend answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

impl From<ValidationError> for BackendError {
    fn from(err: ValidationError) -> Self {
        BackendError::Data(err.to_string())
    }
}

/// Errors from local persistence.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    /// Persisted content exists but cannot be decoded.
    #[error("Malformed persisted data: {0}")]
    Data(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Data(err.to_string())
    }
}
