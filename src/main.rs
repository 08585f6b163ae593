//! RadioHound CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. The JSON envelope is
//! already on stdout when an error reaches here; the error is repeated on
//! stderr and the process exits non-zero.

use radiohound::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
