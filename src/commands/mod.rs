//! Commands
//!
//! The four operations the CLI can run, argument validation, and dispatch
//! against a [`Database`](crate::db::Database).

pub mod handlers;
pub mod parser;

pub use handlers::{Response, dispatch};

/// Rows shown by `head` when `--limit` is not given
pub const DEFAULT_HEAD_LIMIT: usize = 10;

/// Rows shown by `query` when `--limit` is not given
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Upper bound for any `--limit`
pub const MAX_ROW_LIMIT: usize = 10_000;

/// A validated operation, ready to run against an open connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect and round-trip `SELECT 1`
    TestConnection,

    /// List base tables, optionally restricted to one schema
    ListTables {
        schema: Option<String>,
        include_system: bool,
    },

    /// Preview the first rows of a table
    Head {
        table: String,
        schema: Option<String>,
        limit: usize,
    },

    /// Run SQL verbatim and show at most `limit` rows
    Query {
        sql: String,
        limit: usize,
        /// Also cap execution by wrapping the SQL in a `LIMIT` subquery
        server_side_limit: bool,
    },
}
