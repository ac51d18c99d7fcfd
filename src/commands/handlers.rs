//! Command execution handlers
//!
//! Runs a validated [`Command`] against an open connection. There is no
//! retry: the first failure ends the invocation.

use crate::commands::Command;
use crate::commands::parser::wrap_with_limit;
use crate::config::ConnectionConfig;
use crate::db::schema::DEFAULT_SCHEMA;
use crate::db::types::{CellValue, ColumnDef, DataType, QueryOutcome, QueryResults, Row};
use crate::db::{Database, TableName};
use crate::error::Result;

/// What a successfully executed command produced
#[derive(Debug, Clone)]
pub enum Response {
    /// The liveness check passed
    Connected,
    /// Rows or an affected-row count to print
    Outcome(QueryOutcome),
}

/// Execute a command and return what should be printed
pub async fn dispatch<D: Database>(
    db: &D,
    config: &ConnectionConfig,
    command: &Command,
) -> Result<Response> {
    tracing::debug!(?command, "dispatching");
    match command {
        Command::TestConnection => {
            db.ping().await?;
            Ok(Response::Connected)
        }

        Command::ListTables {
            schema,
            include_system,
        } => {
            let schema = schema.as_deref().or(config.default_schema.as_deref());
            let tables = db.list_tables(schema, *include_system).await?;
            Ok(Response::Outcome(QueryOutcome::Rows(tables_to_results(tables))))
        }

        Command::Head {
            table,
            schema,
            limit,
        } => {
            let schema = schema
                .as_deref()
                .or(config.default_schema.as_deref())
                .unwrap_or(DEFAULT_SCHEMA);
            let table = TableName::new(schema, table.as_str())?;
            let results = db.fetch_head(&table, *limit).await?;
            Ok(Response::Outcome(QueryOutcome::Rows(results)))
        }

        Command::Query {
            sql,
            limit,
            server_side_limit,
        } => {
            let outcome = if *server_side_limit {
                db.run_query(&wrap_with_limit(sql, *limit), *limit).await?
            } else {
                db.run_query(sql, *limit).await?
            };
            Ok(Response::Outcome(outcome))
        }
    }
}

/// Present a table listing as a two-column result set
fn tables_to_results(tables: Vec<TableName>) -> QueryResults {
    let columns = vec![
        ColumnDef {
            name: "schema".to_string(),
            data_type: DataType::Text,
        },
        ColumnDef {
            name: "table".to_string(),
            data_type: DataType::Text,
        },
    ];
    let rows = tables
        .into_iter()
        .map(|t| Row {
            values: vec![CellValue::Text(t.schema), CellValue::Text(t.name)],
        })
        .collect();
    QueryResults::new(columns, rows, false)
}
