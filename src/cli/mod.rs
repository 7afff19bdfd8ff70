//! CLI command definitions, argument parsing, and logging setup.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use tracing_subscriber::EnvFilter;

/// Build the filter for `directive`, falling back to the default level.
///
/// Returns the filter and, when the directive was rejected, a warning to log.
pub fn log_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (
            EnvFilter::new(devkey::constants::DEFAULT_LOG_LEVEL),
            Some(format!("ignoring invalid log level {directive:?}: {e}")),
        ),
    }
}

/// Install the stderr `tracing` subscriber, then emit `pending` warnings
/// collected before it existed.
pub fn init_logging(directive: &str, pending: &[String]) {
    let (filter, rejected) = log_filter(directive);

    // Results go to stdout; keep diagnostics on stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    for warning in pending.iter().chain(rejected.as_ref()) {
        tracing::warn!("{warning}");
    }
}
