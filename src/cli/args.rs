//! CLI argument definitions using clap
//!
//! Commands:
//! - radiohound validate <file>
//! - radiohound schema [--out <dir>]
//! - radiohound self-test [--dir <dir>]
//! - radiohound types
//! - radiohound resave <input> <output>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RadioHound - capture record validator and schema tool
#[derive(Parser, Debug)]
#[command(name = "radiohound")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: ./radiohound.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a record file
    Validate {
        /// Record file to check
        file: PathBuf,
    },

    /// Write the JSON Schema of the current format version
    Schema {
        /// Output root; the schema lands in <out>/<version>/schema.json
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Regenerate reference files from the bundled samples
    SelfTest {
        /// Root holding <version>/samples/
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// List the registered element types
    Types,

    /// Load a record and save it again in canonical form
    Resave {
        /// Record file to read
        input: PathBuf,
        /// Target path; the default extension is added if missing
        output: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
