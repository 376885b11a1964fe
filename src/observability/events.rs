//! Observable events
//!
//! Events are explicit and typed. Each maps to a stable upper-case name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in dailylog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Store lifecycle
    /// Record store opened over a backing key
    StoreOpened,
    /// Persisted collection was unreadable and replaced by an empty one
    StoreCorruptionRecovered,
    /// Collection write failed; the previous collection is still in place
    StoreWriteFailed,

    // Record operations
    /// Record created
    RecordCreated,
    /// Record replaced in place
    RecordUpdated,
    /// Update targeted an id that is not stored
    RecordUpdateMissing,
    /// Record deleted
    RecordDeleted,
    /// A draft failed validation
    ValidationFailed,

    // Attachment ingestion
    /// Batch rejected before any conversion
    IngestRejected,
    /// One file in a batch failed to convert
    IngestConversionFailed,
    /// Converted attachments merged into a draft
    IngestMerged,
    /// Ingestion outcome targeted a discarded attachment list
    IngestStale,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreCorruptionRecovered => "STORE_CORRUPTION_RECOVERED",
            Event::StoreWriteFailed => "STORE_WRITE_FAILED",
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordUpdateMissing => "RECORD_UPDATE_MISSING",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::IngestRejected => "INGEST_REJECTED",
            Event::IngestConversionFailed => "INGEST_CONVERSION_FAILED",
            Event::IngestMerged => "INGEST_MERGED",
            Event::IngestStale => "INGEST_STALE",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreWriteFailed => Severity::Error,
            Event::StoreCorruptionRecovered
            | Event::IngestConversionFailed
            | Event::IngestStale => Severity::Warn,
            Event::ValidationFailed
            | Event::RecordUpdateMissing
            | Event::IngestRejected => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
