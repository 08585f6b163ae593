//! CLI command implementations
//!
//! Each command returns the `data` payload of its success envelope; `run`
//! prints the envelope and turns failures into a non-zero exit.

use std::path::Path;

use serde_json::{json, Value};

use crate::observability::{init_tracing, LogFormat};
use crate::record::CaptureRecord;
use crate::schema::write_schema;
use crate::selftest::run_self_test;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(cli.verbose, format);

    let result =
        Config::resolve(cli.config.as_deref()).and_then(|config| run_command(&config, cli.command));

    match result {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(&err)?;
            Err(err)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(config: &Config, cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Validate { file } => validate(config, &file),
        Command::Schema { out } => schema(config, out.as_deref()),
        Command::SelfTest { dir } => self_test(config, &dir),
        Command::Types => types(config),
        Command::Resave { input, output } => resave(config, &input, &output),
    }
}

fn summary(record: &CaptureRecord) -> Value {
    let metadata = record.metadata();
    json!({
        "version": record.version(),
        "short_name": record.short_name(),
        "mac_address": record.mac_address(),
        "timestamp": record.timestamp().to_rfc3339(),
        "type": record.element_type().name(),
        "samples": record.samples().len(),
        "data_type": metadata.data_type().as_str(),
        "fmin": metadata.fmin(),
        "fmax": metadata.fmax(),
        "nfft_power_of_two": metadata.nfft_is_power_of_two(),
        "custom_fields": record.custom_fields().keys().collect::<Vec<_>>(),
    })
}

/// Load and validate one record file
pub fn validate(config: &Config, file: &Path) -> CliResult<Value> {
    let record = config.codec()?.load(file)?;
    Ok(json!({
        "path": file.display().to_string(),
        "record": summary(&record),
    }))
}

/// Write the schema document under `out`, or the configured output dir
pub fn schema(config: &Config, out: Option<&Path>) -> CliResult<Value> {
    let registry = config.registry()?;
    let dir = out.unwrap_or(config.output_dir.as_path());
    let path = write_schema(dir, &registry)?;
    Ok(json!({ "path": path.display().to_string() }))
}

/// Run the reference self-test rooted at `dir`
pub fn self_test(config: &Config, dir: &Path) -> CliResult<Value> {
    let report = run_self_test(&config.codec()?, dir)?;
    let data = serde_json::to_value(&report)?;

    if report.passed() {
        Ok(data)
    } else {
        let failed = report.outcomes.iter().filter(|o| !o.passed()).count();
        Err(CliError::self_test_failed(failed, report.outcomes.len()).with_details(data))
    }
}

/// List the registry as catalog entries
pub fn types(config: &Config) -> CliResult<Value> {
    let registry = config.registry()?;
    Ok(json!({ "types": serde_json::to_value(registry.catalog())? }))
}

/// Load `input` and save it to `output` in canonical form
pub fn resave(config: &Config, input: &Path, output: &Path) -> CliResult<Value> {
    let codec = config.codec()?;
    let record = codec.load(input)?;
    let written = codec.save(&record, output)?;
    Ok(json!({
        "input": input.display().to_string(),
        "output": written.display().to_string(),
    }))
}
