//! Observability for dailylog
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//!
//! Observability is read-only: a failed log write never changes the outcome of
//! the operation being logged.
//!
//! # Usage
//!
//! ```ignore
//! use dailylog::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RecordCreated, &[("id", "…")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Only verifies no panic
        log_event(Event::StoreOpened);
        log_event(Event::RecordDeleted);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::IngestMerged, &[("count", "2")]);
    }
}
