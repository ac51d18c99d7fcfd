//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`, so stdout only ever carries
//! query results.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`
pub const LOG_ENV: &str = "PGPEEK_LOG";

/// Default filter for a given `-v` count.
pub fn default_log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "pgpeek=info,warn",
        _ => "pgpeek=debug,tokio_postgres=debug,info",
    }
}

/// Build the environment filter (priority: PGPEEK_LOG > RUST_LOG > -v default).
fn build_env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbosity)))
}

/// Colour only a terminal, and never when `NO_COLOR` is set to anything.
fn use_ansi(is_terminal: bool, no_color: Option<std::ffi::OsString>) -> bool {
    is_terminal && no_color.is_none_or(|v| v.is_empty())
}

/// Install the global subscriber. Safe to call once per process.
pub fn init_logging(verbosity: u8) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi(
            std::io::stderr().is_terminal(),
            std::env::var_os("NO_COLOR"),
        ))
        .with_target(verbosity > 1)
        .with_thread_ids(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("warning: logging already initialized: {}", e);
    }
}
