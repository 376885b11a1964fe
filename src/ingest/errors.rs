//! # Ingestion Errors

use thiserror::Error;

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Batch-level ingestion errors. The target attachment list is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Too many attachments: {current} attached + {requested} selected exceeds the limit of {limit}")]
    Capacity {
        current: usize,
        requested: usize,
        limit: usize,
    },

    #[error("Attachment list was discarded before ingestion finished")]
    Stale,
}

impl IngestError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Capacity { .. } => "DAILY_INGEST_CAPACITY",
            IngestError::Stale => "DAILY_INGEST_STALE",
        }
    }
}

/// Why a single file could not be converted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionFailure {
    #[error("read failed: {0}")]
    Read(String),

    #[error("file is empty")]
    Empty,

    #[error("file too large: {size} bytes (max: {max})")]
    TooLarge { size: u64, max: u64 },
}

/// Per-file conversion error. Siblings in the same batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to convert attachment #{} '{}': {}", .index + 1, .name, .failure)]
pub struct ConversionError {
    /// Position in the submitted batch (0-based)
    pub index: usize,
    pub name: String,
    pub failure: ConversionFailure,
}

impl ConversionError {
    pub fn code(&self) -> &'static str {
        "DAILY_INGEST_CONVERSION"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let capacity = IngestError::Capacity {
            current: 3,
            requested: 3,
            limit: 5,
        };
        assert_eq!(capacity.code(), "DAILY_INGEST_CAPACITY");
        assert_eq!(IngestError::Stale.code(), "DAILY_INGEST_STALE");
    }

    #[test]
    fn test_conversion_error_display_is_one_based() {
        let err = ConversionError {
            index: 1,
            name: "shot.png".into(),
            failure: ConversionFailure::Empty,
        };
        assert_eq!(
            err.to_string(),
            "Failed to convert attachment #2 'shot.png': file is empty"
        );
    }
}
