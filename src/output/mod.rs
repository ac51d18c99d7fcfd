//! Result formatting
//!
//! Turns a [`QueryOutcome`] into the text written to standard output.

pub mod export;
pub mod table;

use crate::db::types::QueryOutcome;

pub use table::NO_ROWS;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading in a terminal
    #[default]
    Table,
    /// RFC 4180 CSV with a header row
    Csv,
    /// Pretty-printed JSON array of objects
    Json,
}

/// Render a statement outcome in the requested format
pub fn render(outcome: &QueryOutcome, format: OutputFormat) -> String {
    match (outcome, format) {
        (QueryOutcome::Rows(results), OutputFormat::Table) => table::to_table(results),
        (QueryOutcome::Rows(results), OutputFormat::Csv) => export::to_csv(results),
        (QueryOutcome::Rows(results), OutputFormat::Json) => export::to_json(results),
        (QueryOutcome::Affected(n), OutputFormat::Table) => {
            let noun = if *n == 1 { "row" } else { "rows" };
            format!("Query executed. {} {} affected.\n", n, noun)
        }
        (QueryOutcome::Affected(n), OutputFormat::Csv) => format!("rows_affected\n{}\n", n),
        (QueryOutcome::Affected(n), OutputFormat::Json) => {
            format!("{}\n", serde_json::json!({ "rows_affected": n }))
        }
    }
}
