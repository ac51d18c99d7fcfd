//! Database abstraction layer
//!
//! The [`Database`] trait is the seam between command dispatch and the
//! PostgreSQL driver, so dispatch can be exercised against an in-memory
//! double in tests.

pub mod postgres;
pub mod schema;
pub mod types;

use crate::error::DbResult;

// Re-export main types
pub use postgres::PostgresSession;
pub use schema::TableName;
pub use types::{CellValue, ColumnDef, DataType, QueryOutcome, QueryResults, Row};

/// Operations the command dispatcher needs from a database connection.
///
/// Only used with static dispatch within the crate, so `Send` bounds on the
/// returned futures are not required.
#[allow(async_fn_in_trait)]
pub trait Database {
    /// Round-trip a trivial query to prove the connection is live
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if the server does not answer correctly
    async fn ping(&self) -> DbResult<()>;

    /// List base tables from the catalog, ordered by schema then name
    ///
    /// With `schema` set, only that schema is listed. Otherwise system
    /// schemas are skipped unless `include_system` is true.
    async fn list_tables(
        &self,
        schema: Option<&str>,
        include_system: bool,
    ) -> DbResult<Vec<TableName>>;

    /// Fetch at most `limit` rows from a table
    async fn fetch_head(&self, table: &TableName, limit: usize) -> DbResult<QueryResults>;

    /// Run arbitrary SQL and keep at most `limit` rows of its result
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` carrying the server's message
    async fn run_query(&self, sql: &str, limit: usize) -> DbResult<QueryOutcome>;
}
