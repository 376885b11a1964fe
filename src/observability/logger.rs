//! Structured JSON logger
//!
//! - One log line = one event
//! - Deterministic key ordering (fields sorted by key)
//! - Explicit severity levels with a process-wide threshold
//! - Synchronous, no buffering
//!
//! Log lines go to stderr. Stdout belongs to the CLI response channel.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(format!(
                "unknown log level '{}' (expected trace, info, warn or error)",
                other
            )),
        }
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Set the minimum severity that gets written.
    pub fn set_threshold(severity: Severity) {
        THRESHOLD.store(severity as u8, Ordering::Relaxed);
    }

    /// Current minimum severity.
    pub fn threshold() -> Severity {
        Severity::from_u8(THRESHOLD.load(Ordering::Relaxed))
    }

    /// Whether a line at `severity` would be written.
    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::threshold()
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        let line = Self::format_line(severity, event, fields);
        let mut stderr = io::stderr().lock();
        // A failed log write never affects the operation being logged
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }

    /// Render one log line, newline-terminated.
    ///
    /// `serde_json::Map` is ordered by key, which gives deterministic output.
    pub fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut object = Map::new();
        for (key, value) in fields {
            object.insert((*key).to_string(), Value::String((*value).to_string()));
        }
        object.insert("event".into(), Value::String(event.to_string()));
        object.insert("severity".into(), Value::String(severity.as_str().to_string()));
        object.insert(
            "ts".into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        let mut line = Value::Object(object).to_string();
        line.push('\n');
        line
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!(" info ".parse::<Severity>().unwrap(), Severity::Info);
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_format_line_is_json_with_sorted_keys() {
        let line = Logger::format_line(
            Severity::Info,
            "RECORD_CREATED",
            &[("title", "Monday"), ("id", "abc")],
        );
        assert!(line.ends_with('\n'));

        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["event"], "RECORD_CREATED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["id"], "abc");

        let id_pos = line.find("\"id\"").unwrap();
        let title_pos = line.find("\"title\"").unwrap();
        assert!(id_pos < title_pos);
    }

    #[test]
    fn test_format_line_escapes_values() {
        let line = Logger::format_line(Severity::Warn, "X", &[("msg", "a \"quoted\"\nline")]);
        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["msg"], "a \"quoted\"\nline");
    }
}
