//! Catalog names
//!
//! Schema-qualified table names and identifier quoting.

use crate::error::{CommandError, CommandResult};
use std::fmt;

/// Schema assumed when neither the command line nor the environment names one
pub const DEFAULT_SCHEMA: &str = "public";

/// A schema-qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    /// Schema name
    pub schema: String,
    /// Table name
    pub name: String,
}

impl TableName {
    /// Build a table name, rejecting identifiers PostgreSQL cannot represent
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> CommandResult<Self> {
        let schema = schema.into();
        let name = name.into();
        validate_identifier("schema", &schema)?;
        validate_identifier("table", &name)?;
        Ok(Self { schema, name })
    }

    /// `"schema"."table"`, safe to splice into SQL text
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.name))
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Double-quote an identifier, doubling any embedded quotes.
///
/// Quoting preserves case and allows any character except NUL, so the
/// identifier is always taken literally.
pub fn quote_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push('"');
    for c in ident.chars() {
        if c == '"' {
            out.push_str("\"\"");
        } else {
            out.push(c);
        }
    }
    out.push('"');
    out
}

/// Reject identifiers that cannot name a PostgreSQL object
pub fn validate_identifier(kind: &str, ident: &str) -> CommandResult<()> {
    if ident.is_empty() {
        return Err(CommandError::InvalidArgument(format!(
            "{} name must not be empty",
            kind
        )));
    }
    if ident.contains('\0') {
        return Err(CommandError::InvalidArgument(format!(
            "{} name must not contain NUL characters",
            kind
        )));
    }
    Ok(())
}
