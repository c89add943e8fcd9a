//! Error types for tokenmeter-core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Team id does not exist
    #[error("team not found: {0}")]
    TeamNotFound(Uuid),

    /// Model id does not exist
    #[error("model not found: {0}")]
    ModelNotFound(Uuid),

    /// A field on a create/update request was missing or invalid
    #[error("validation failed on '{field}': {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable message
        message: String,
    },

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error (migrations, corrupt rows, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a validation failure
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}
