//! CLI module for RadioHound
//!
//! Provides command-line interface for:
//! - validate: Load and check a record file
//! - schema: Write the JSON Schema
//! - self-test: Regenerate and compare reference files
//! - types: List element types
//! - resave: Rewrite a record in canonical form

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{resave, run, run_command, schema, self_test, types, validate};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, ok_envelope, write_error, write_response};
