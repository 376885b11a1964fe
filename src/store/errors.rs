//! # Record Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "DAILY_NOT_FOUND",
            StoreError::InvalidKey(_) => "DAILY_STORE_INVALID_KEY",
            StoreError::IoError(_) => "DAILY_STORE_IO",
            StoreError::Serialization(_) => "DAILY_STORE_SERIALIZATION",
            StoreError::Internal(_) => "DAILY_STORE_INTERNAL",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
