//! Command construction
//!
//! Turns raw CLI values into validated [`Command`]s. Everything here is
//! checked before any network I/O happens.

use crate::commands::{Command, DEFAULT_HEAD_LIMIT, DEFAULT_QUERY_LIMIT, MAX_ROW_LIMIT};
use crate::db::schema::validate_identifier;
use crate::error::{CommandError, CommandResult};

/// Validate an optional `--limit`, falling back to `default`
pub fn parse_limit(value: Option<i64>, default: usize) -> CommandResult<usize> {
    let Some(value) = value else {
        return Ok(default);
    };
    if value <= 0 {
        return Err(CommandError::InvalidArgument(format!(
            "--limit must be a positive integer, got {}",
            value
        )));
    }
    let limit = usize::try_from(value).unwrap_or(usize::MAX);
    if limit > MAX_ROW_LIMIT {
        return Err(CommandError::InvalidArgument(format!(
            "--limit must be at most {}, got {}",
            MAX_ROW_LIMIT, value
        )));
    }
    Ok(limit)
}

pub fn tables(schema: Option<&str>, include_system: bool) -> CommandResult<Command> {
    if let Some(schema) = schema {
        validate_identifier("schema", schema)?;
    }
    Ok(Command::ListTables {
        schema: schema.map(str::to_string),
        include_system,
    })
}

pub fn head(table: &str, schema: Option<&str>, limit: Option<i64>) -> CommandResult<Command> {
    validate_identifier("table", table)?;
    if let Some(schema) = schema {
        validate_identifier("schema", schema)?;
    }
    Ok(Command::Head {
        table: table.to_string(),
        schema: schema.map(str::to_string),
        limit: parse_limit(limit, DEFAULT_HEAD_LIMIT)?,
    })
}

pub fn query(sql: &str, limit: Option<i64>, server_side_limit: bool) -> CommandResult<Command> {
    let sql = normalize_sql(sql);
    if sql.is_empty() {
        return Err(CommandError::MissingArgument("SQL text".to_string()));
    }
    Ok(Command::Query {
        sql: sql.to_string(),
        limit: parse_limit(limit, DEFAULT_QUERY_LIMIT)?,
        server_side_limit,
    })
}

/// Trim whitespace and trailing semicolons
pub fn normalize_sql(sql: &str) -> &str {
    sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}

/// Wrap a query so the server stops after `limit` rows
pub fn wrap_with_limit(sql: &str, limit: usize) -> String {
    format!("SELECT * FROM ({}\n) AS q LIMIT {}", normalize_sql(sql), limit)
}
