//! pgpeek - a small command-line PostgreSQL client
//!
//! This is the main entry point for the pgpeek binary.
//! The actual logic is in the library modules for better testability.

use clap::Parser;
use pgpeek::cli::Cli;
use pgpeek::commands::{Response, dispatch};
use pgpeek::config::ConnectionConfig;
use pgpeek::db::PostgresSession;
use pgpeek::output;
use pgpeek::{PgpeekError, Result, logging};
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

/// Conventional status for termination by SIGINT
const EXIT_INTERRUPTED: u8 = 130;

/// How long each cleanup step may take after an interrupt
const CANCEL_GRACE: Duration = Duration::from_secs(5);

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment; existing vars win
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring .env: {}", e),
    }

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let command = cli.command.to_command()?;
    let config = ConnectionConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let session = PostgresSession::connect(&config).await?;

    let result = tokio::select! {
        result = dispatch(&session, &config, &command) => Some(result),
        _ = interrupted() => None,
    };

    let Some(result) = result else {
        tracing::warn!("interrupted, cancelling query");
        // A second Ctrl-C drops the session, which aborts the connection
        tokio::select! {
            _ = session.cancel_and_close(CANCEL_GRACE) => {}
            _ = interrupted() => tracing::warn!("interrupted again, abandoning the connection"),
        }
        eprintln!("interrupted");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };

    session.close().await;

    let text = match result? {
        Response::Connected => {
            format!("Connection successful ({})\n", config.display_target())
        }
        Response::Outcome(outcome) => output::render(&outcome, cli.format),
    };
    write_stdout(&text)?;
    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C. If the handler can't be installed it never resolves.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Write to stdout, treating a closed pipe (e.g. `| head`) as success.
fn write_stdout(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    match out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(PgpeekError::Io(e)),
    }
}
