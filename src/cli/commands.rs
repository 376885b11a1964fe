//! CLI command implementations
//!
//! Every command: load config → set log threshold → open the log → run one
//! operation → print one JSON response.
//!
//! Record-level failures are printed as error responses and the process still
//! exits 0. Only configuration and I/O problems become `CliError`.

use std::path::Path;

use serde_json::{json, Value};

use crate::config::Config;
use crate::ingest::PathSource;
use crate::observability::Logger;
use crate::schema::RecordId;
use crate::service::{DailyLog, ServiceError};
use crate::store::{FileKv, KeyValueStore};

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_request, write_error, write_response};

/// Parse arguments and run
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch one command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Create { config } => create(&config),
        Command::List { config, query } => list(&config, &query),
        Command::Show { id, config, full } => show(&config, &id, full),
        Command::Edit { id, config } => edit(&config, &id),
        Command::Delete { id, config } => delete(&config, &id),
        Command::Attach { id, files, config } => attach(&config, &id, &files),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_threshold(config.severity()?);
    Ok(config)
}

fn open(config_path: &Path) -> CliResult<DailyLog<FileKv>> {
    let config = load_config(config_path)?;
    Ok(DailyLog::open(&config)?)
}

/// Print a service outcome as a response
fn respond(result: Result<Value, ServiceError>) -> CliResult<()> {
    match result {
        Ok(data) => write_response(data),
        Err(ServiceError::Validation(errors)) => write_error(
            errors.code(),
            "Validation failed",
            Some(serde_json::to_value(&errors)?),
        ),
        Err(ServiceError::NotFound(id)) => write_error(
            "DAILY_NOT_FOUND",
            &format!("Record not found: {}", id),
            Some(json!({ "id": id })),
        ),
        Err(e) => write_error(e.code(), &e.to_string(), None),
    }
}

/// Create the data directory and an empty collection.
///
/// A missing config file is created with defaults first.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = if config_path.exists() {
        load_config(config_path)?
    } else {
        let config = Config::write_default(config_path)?;
        Logger::set_threshold(config.severity()?);
        config
    };
    let kv = FileKv::new(&config.data_dir);

    if kv.get(&config.storage_key)?.is_some() {
        return Err(CliError::already_initialized(&config.data_dir));
    }
    kv.set(&config.storage_key, "[]")?;

    write_response(json!({
        "initialized": true,
        "data_dir": config.data_dir,
    }))
}

/// Create a record from a draft on stdin
pub fn create(config_path: &Path) -> CliResult<()> {
    let log = open(config_path)?;
    let draft = read_request()?;
    respond(log.create_json(&draft).map(|id| json!({ "id": id })))
}

/// List records, filtered by title
pub fn list(config_path: &Path, query: &str) -> CliResult<()> {
    let log = open(config_path)?;
    let result = log
        .search(query)
        .and_then(|rows| serde_json::to_value(rows).map_err(internal));
    respond(result)
}

/// Show one record
pub fn show(config_path: &Path, id: &str, full: bool) -> CliResult<()> {
    let log = open(config_path)?;
    let id = RecordId::from(id);

    let result = if full {
        log.get(&id).and_then(|record| {
            let record = record.ok_or_else(|| ServiceError::NotFound(id.clone()))?;
            serde_json::to_value(record).map_err(internal)
        })
    } else {
        log.detail(&id).and_then(|detail| {
            let detail = detail.ok_or_else(|| ServiceError::NotFound(id.clone()))?;
            serde_json::to_value(detail).map_err(internal)
        })
    };
    respond(result)
}

/// Replace a record with a draft on stdin
pub fn edit(config_path: &Path, id: &str) -> CliResult<()> {
    let log = open(config_path)?;
    let draft = read_request()?;
    let id = RecordId::from(id);
    respond(
        log.update_json(&id, &draft)
            .map(|()| json!({ "id": id, "updated": true })),
    )
}

/// Delete a record
pub fn delete(config_path: &Path, id: &str) -> CliResult<()> {
    let log = open(config_path)?;
    let id = RecordId::from(id);
    respond(log.delete(&id).map(|()| json!({ "id": id, "deleted": true })))
}

/// Attach files to a record, converting them on a single-threaded runtime
pub fn attach(config_path: &Path, id: &str, files: &[std::path::PathBuf]) -> CliResult<()> {
    let log = open(config_path)?;
    let id = RecordId::from(id);
    let sources: Vec<PathSource> = files.iter().map(PathSource::new).collect();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            CliError::new(CliErrorCode::Io, format!("Failed to start runtime: {}", e))
        })?;

    let result = runtime.block_on(log.attach(&id, &sources)).map(|report| {
        let failures: Vec<Value> = report
            .failures
            .iter()
            .map(|f| json!({ "index": f.index, "name": f.name, "reason": f.failure.to_string() }))
            .collect();
        json!({ "id": id, "added": report.added, "failures": failures })
    });
    respond(result)
}

fn internal(e: serde_json::Error) -> ServiceError {
    ServiceError::Store(crate::store::StoreError::Serialization(e.to_string()))
}
