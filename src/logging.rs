//! `tracing` subscriber setup for the command-line tool.

use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::CliError;

/// Installs a stderr `fmt` subscriber filtered by `level`
/// (any `EnvFilter` directive, e.g. `debug` or `jenkinshash=trace`).
pub fn init_logging(level: &str) -> Result<(), CliError> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level)
                .map_err(|e| CliError::Message(format!("invalid log level: {e}")))?,
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|_| CliError::Message("logging already initialized".into()))
}
