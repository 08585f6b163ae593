//! JSON output for the CLI
//!
//! Every command prints exactly one JSON object on stdout:
//! `{"status":"ok","data":...}` or `{"status":"error","code":...,"message":...}`.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Success envelope
pub fn ok_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope; details, when present, go under `data`
pub fn error_envelope(err: &CliError) -> Value {
    let mut response = json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    });
    if let Some(details) = err.details() {
        response["data"] = details.clone();
    }
    response
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&ok_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(err: &CliError) -> CliResult<()> {
    write_line(&error_envelope(err))
}
