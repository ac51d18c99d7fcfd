//! Command-line interface
//!
//! clap definitions for the `pgpeek` binary. Values are kept raw here and
//! validated by [`commands::parser`](crate::commands::parser).

use crate::commands::{Command, parser};
use crate::error::CommandResult;
use crate::output::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Poke at a PostgreSQL database from the shell.
///
/// Connection settings are read from DATABASE_URL and/or DB_HOST, DB_PORT,
/// DB_NAME, DB_USER, DB_PASSWORD, DB_SSLMODE (a `.env` file in the working
/// directory is loaded first).
#[derive(Debug, Parser)]
#[command(name = "pgpeek", version, about, long_about)]
pub struct Cli {
    /// Output format for result sets
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug); logs go to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect and run `SELECT 1`
    TestConnection,

    /// List tables (all user schemas unless --schema or DB_SCHEMA is set)
    Tables {
        /// Only list tables in this schema
        #[arg(long)]
        schema: Option<String>,

        /// Include pg_catalog and information_schema
        #[arg(long)]
        include_system: bool,
    },

    /// Show the first rows of a table
    Head {
        /// Table name (taken literally, case-sensitive)
        table: String,

        /// Schema name (default: DB_SCHEMA, then public)
        #[arg(long)]
        schema: Option<String>,

        /// Number of rows to show [default: 10]
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Run a SQL statement and print its result
    Query {
        /// SQL to execute
        sql: String,

        /// Maximum rows to display [default: 100]
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Also cap server-side execution by wrapping the query in
        /// `SELECT * FROM (...) LIMIT n` (row-returning queries only)
        #[arg(long)]
        server_limit: bool,
    },
}

impl Commands {
    /// Validate the raw arguments into a [`Command`]
    pub fn to_command(&self) -> CommandResult<Command> {
        match self {
            Commands::TestConnection => Ok(Command::TestConnection),
            Commands::Tables {
                schema,
                include_system,
            } => parser::tables(schema.as_deref(), *include_system),
            Commands::Head {
                table,
                schema,
                limit,
            } => parser::head(table, schema.as_deref(), *limit),
            Commands::Query {
                sql,
                limit,
                server_limit,
            } => parser::query(sql, *limit, *server_limit),
        }
    }
}
