//! Observability for RadioHound
//!
//! Logging goes through `tracing`. Each line carries an `event` field from
//! [`Event`]; the binary installs a `tracing-subscriber` formatter, library
//! users bring their own subscriber.

mod events;

pub use events::Event;

use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global subscriber for the command-line driver.
///
/// `RUST_LOG` wins over the level chosen here. Installing twice is a no-op.
pub fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
