//! Process-level CLI failures
//!
//! A `CliError` ends the process with exit code 1. Record-level outcomes
//! (validation, not found, capacity) never become one; they are written to
//! stdout as JSON error responses.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::ConfigError;
use crate::service::ServiceError;
use crate::store::StoreError;

/// What went wrong before a command could produce a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Config file unreadable, malformed or out of range
    Config,
    /// stdin/stdout, request JSON or runtime startup
    Io,
    /// `init` found an existing collection
    AlreadyInitialized,
    /// Data directory or collection could not be opened or created
    StoreUnavailable,
}

impl CliErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "DAILY_CLI_CONFIG_ERROR",
            Self::Io => "DAILY_CLI_IO_ERROR",
            Self::AlreadyInitialized => "DAILY_CLI_ALREADY_INITIALIZED",
            Self::StoreUnavailable => "DAILY_CLI_STORE_UNAVAILABLE",
        }
    }
}

/// Fatal CLI error, printed to stderr as `<code>: <message>`
#[derive(Debug, Error)]
#[error("{}: {}", .code.as_str(), .message)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn already_initialized(data_dir: &Path) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Collection already exists in '{}'", data_dir.display()),
        )
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::new(CliErrorCode::Io, e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(CliErrorCode::Io, format!("Invalid JSON: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::Config, e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreUnavailable, e.to_string())
    }
}

/// Only `DailyLog::open` reaches this; errors from record operations are
/// turned into responses instead.
impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        Self::new(CliErrorCode::StoreUnavailable, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
