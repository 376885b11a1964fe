//! CLI module for dailylog
//!
//! A thin presentation layer over `service::DailyLog`:
//! - init: create the data directory and empty collection
//! - create / edit: draft JSON on stdin
//! - list / show: read-only views
//! - delete: idempotent removal
//! - attach: ingest image files into a record

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{attach, create, delete, edit, init, list, run, run_command, show};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
