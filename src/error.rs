//! Error types for pgpeek
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.

use std::error::Error as _;
use std::io;

/// Main error type for the pgpeek application
#[derive(Debug, thiserror::Error)]
pub enum PgpeekError {
    /// Database-related errors
    #[error(transparent)]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Command argument errors
    #[error("Invalid arguments: {0}")]
    Command(#[from] CommandError),
}

impl PgpeekError {
    /// Process exit status for this error
    ///
    /// Argument errors use 2 to match clap's usage-error convention;
    /// everything else is a plain failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PgpeekError::Command(_) => 2,
            PgpeekError::Database(_) | PgpeekError::Config(_) | PgpeekError::Io(_) => 1,
        }
    }
}

/// Database operation errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection (network, TLS or authentication)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Type conversion error
    #[error("Type conversion error: {0}")]
    TypeConversion(String),
}

impl DbError {
    /// Wrap a driver error raised while connecting
    pub fn connection(err: &tokio_postgres::Error) -> Self {
        DbError::ConnectionFailed(describe_pg_error(err))
    }

    /// Wrap a driver error raised while running a statement
    pub fn query(err: &tokio_postgres::Error) -> Self {
        DbError::QueryFailed(describe_pg_error(err))
    }
}

/// Render a driver error the way the server reported it.
///
/// Server-side errors carry severity, message, detail and hint; those are
/// passed through as-is. Client-side errors (I/O, TLS, protocol) fall back to
/// the driver's own message plus its source chain.
pub fn describe_pg_error(err: &tokio_postgres::Error) -> String {
    if let Some(db) = err.as_db_error() {
        let mut msg = format!("{}: {}", db.severity(), db.message());
        if let Some(detail) = db.detail() {
            msg.push_str(&format!(" (DETAIL: {})", detail));
        }
        if let Some(hint) = db.hint() {
            msg.push_str(&format!(" (HINT: {})", hint));
        }
        return msg;
    }

    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is absent or empty
    #[error("{0} is not set")]
    Missing(String),

    /// Invalid configuration value
    #[error("{0}")]
    Invalid(String),
}

/// Command argument errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Missing required argument
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Invalid argument
    #[error("{0}")]
    InvalidArgument(String),
}

/// Specialized Result type for pgpeek operations
pub type Result<T> = std::result::Result<T, PgpeekError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for command operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;
