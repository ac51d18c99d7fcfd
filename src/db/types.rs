//! Database type definitions
//!
//! Core data structures for representing database query results,
//! data types, and values.

/// Outcome of running a single statement
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The statement produced a row set (possibly empty)
    Rows(QueryResults),
    /// The statement returned no columns; carries the affected row count
    Affected(u64),
}

/// Query execution results
#[derive(Debug, Clone)]
pub struct QueryResults {
    /// Column definitions
    pub columns: Vec<ColumnDef>,
    /// Result rows
    pub rows: Vec<Row>,
    /// True when the server had more rows than were fetched
    pub truncated: bool,
}

/// Column definition in query results
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
}

/// Database data types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    SmallInt,
    Integer,
    BigInt,

    // Floating point
    Real,
    Double,
    Numeric,

    // Text types
    Text,
    Varchar,
    Char,

    // Boolean
    Boolean,

    // Date/time types
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,

    // JSON types
    Json,
    Jsonb,

    // Binary data
    Bytea,

    // UUID
    Uuid,

    // Array type
    Array(Box<DataType>),

    // Other/unknown types
    Unknown(String),
}

/// A single row of query results
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub values: Vec<CellValue>,
}

/// A cell value (single column value in a row)
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// NULL value
    Null,

    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// Arbitrary-precision numeric, kept in its canonical text form
    Numeric(String),

    /// Text/string value
    Text(String),

    /// Boolean value
    Boolean(bool),

    /// JSON value (parsed)
    Json(serde_json::Value),

    /// Binary data
    Binary(Vec<u8>),

    /// Date/time value
    DateTime(String),

    /// UUID value
    Uuid(String),

    /// Array value
    Array(Vec<CellValue>),
}

impl QueryResults {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Row>, truncated: bool) -> Self {
        Self {
            columns,
            rows,
            truncated,
        }
    }

    /// Number of fetched rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl DataType {
    /// Whether values of this type read best right-aligned
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::SmallInt
                | DataType::Integer
                | DataType::BigInt
                | DataType::Real
                | DataType::Double
                | DataType::Numeric
        )
    }
}

/// Placeholder shown for NULL in text output
pub const NULL_DISPLAY: &str = "NULL";

impl CellValue {
    /// Canonical text form of the value, untruncated
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Null => NULL_DISPLAY.to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Numeric(s) => s.clone(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Json(v) => v.to_string(),
            CellValue::Binary(b) => hex_encode(b),
            CellValue::DateTime(s) => s.clone(),
            CellValue::Uuid(s) => s.clone(),
            CellValue::Array(arr) => {
                let items: Vec<String> = arr.iter().map(|v| v.display_string()).collect();
                format!("{{{}}}", items.join(","))
            }
        }
    }

    /// Check if this is a NULL value
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Hex-encode binary data (e.g. `\xdeadbeef`), matching PostgreSQL's bytea output.
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 + bytes.len() * 2);
    s.push_str("\\x");
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_display_string() {
        assert_eq!(CellValue::Text("Hello".to_string()).display_string(), "Hello");
        assert_eq!(CellValue::Integer(-7).display_string(), "-7");
        assert_eq!(CellValue::Boolean(true).display_string(), "true");
        assert_eq!(CellValue::Null.display_string(), "NULL");
        assert_eq!(CellValue::Numeric("10.50".into()).display_string(), "10.50");
    }

    #[test]
    fn test_cell_value_is_null() {
        assert!(CellValue::Null.is_null());
        assert!(!CellValue::Integer(42).is_null());
    }

    #[test]
    fn test_array_display_string() {
        let arr = CellValue::Array(vec![
            CellValue::Text("a".to_string()),
            CellValue::Text("b".to_string()),
        ]);
        assert_eq!(arr.display_string(), "{a,b}");
    }

    #[test]
    fn test_binary_display_is_hex() {
        let bin = CellValue::Binary(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bin.display_string(), "\\xdeadbeef");
    }

    #[test]
    fn test_numeric_types() {
        assert!(DataType::Integer.is_numeric());
        assert!(DataType::Numeric.is_numeric());
        assert!(!DataType::Text.is_numeric());
        assert!(!DataType::Array(Box::new(DataType::Integer)).is_numeric());
    }

    #[test]
    fn test_results_row_count() {
        let results = QueryResults::new(
            vec![ColumnDef {
                name: "x".into(),
                data_type: DataType::Integer,
            }],
            vec![Row {
                values: vec![CellValue::Integer(1)],
            }],
            false,
        );
        assert_eq!(results.row_count(), 1);
        assert!(!results.is_empty());
    }
}
