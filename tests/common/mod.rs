//! Common test utilities and helpers
//!
//! Shared test infrastructure for integration tests.

use pgpeek::config::{ConnectionConfig, SslMode};
use pgpeek::db::PostgresSession;

/// Connection settings for the integration database
pub fn test_config() -> ConnectionConfig {
    ConnectionConfig {
        host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("TEST_DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5433),
        database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "test_db".to_string()),
        username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "test_user".to_string()),
        password: Some(
            std::env::var("TEST_DB_PASSWORD").unwrap_or_else(|_| "test_password".to_string()),
        ),
        ssl_mode: SslMode::Disable,
        default_schema: None,
        connect_timeout: Some(std::time::Duration::from_secs(5)),
        statement_timeout: None,
    }
}

/// Connect to the integration database, or `None` (with a note) if it is down
pub async fn try_connect() -> Option<PostgresSession> {
    let config = test_config();
    match PostgresSession::connect(&config).await {
        Ok(session) => Some(session),
        Err(e) => {
            eprintln!(
                "Skipping test: Database not available at {}:{} - {}",
                config.host, config.port, e
            );
            None
        }
    }
}

/// A table name unlikely to collide between concurrent test runs
pub fn unique_table(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("{}_{}_{}", prefix, std::process::id(), nanos)
}
