//! JSON I/O handling for CLI
//!
//! - Input: single JSON object via stdin
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliErrorCode, CliResult};

/// Read one JSON document from stdin (may span several lines)
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::new(CliErrorCode::Io, "Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

fn ok_body(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

fn error_body(code: &str, message: &str, details: Option<Value>) -> Value {
    let mut body = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if let Some(details) = details {
        body["details"] = details;
    }
    body
}

fn write_line(body: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, body)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&ok_body(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, details: Option<Value>) -> CliResult<()> {
    write_line(&error_body(code, message, details))
}
