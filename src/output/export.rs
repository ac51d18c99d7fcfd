//! CSV / JSON renderings of query results
//!
//! Pure serialization functions; the caller decides where the string goes.

use crate::db::types::{CellValue, QueryResults, hex_encode};

/// Serialize query results as RFC 4180 CSV.
pub fn to_csv(results: &QueryResults) -> String {
    let mut out = String::new();

    // Header row
    for (i, col) in results.columns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        csv_escape_into(&mut out, &col.name);
    }
    out.push('\n');

    // Data rows
    for row in &results.rows {
        for (i, cell) in row.values.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let text = cell_to_export_string(cell);
            csv_escape_into(&mut out, &text);
        }
        out.push('\n');
    }

    out
}

/// Serialize query results as a JSON array of objects with typed values.
pub fn to_json(results: &QueryResults) -> String {
    let col_names: Vec<&str> = results.columns.iter().map(|c| c.name.as_str()).collect();

    let rows: Vec<serde_json::Value> = results
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for (i, cell) in row.values.iter().enumerate() {
                let key = col_names.get(i).copied().unwrap_or("?");
                obj.insert(key.to_string(), cell_to_json(cell));
            }
            serde_json::Value::Object(obj)
        })
        .collect();

    let mut out = serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string());
    out.push('\n');
    out
}

/// Full untruncated value string for CSV export (NULL → empty string).
fn cell_to_export_string(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Array(arr) => {
            let items: Vec<String> = arr.iter().map(cell_to_export_string).collect();
            format!("{{{}}}", items.join(","))
        }
        other => other.display_string(),
    }
}

/// Convert a CellValue to a serde_json::Value with type preservation.
fn cell_to_json(cell: &CellValue) -> serde_json::Value {
    match cell {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Integer(i) => serde_json::json!(*i),
        CellValue::Float(f) => {
            if f.is_finite() {
                serde_json::json!(*f)
            } else {
                // NaN / Infinity aren't valid JSON numbers
                serde_json::Value::String(f.to_string())
            }
        }
        // Kept as a string so no precision is lost
        CellValue::Numeric(s) => serde_json::Value::String(s.clone()),
        CellValue::Text(s) => serde_json::Value::String(s.clone()),
        CellValue::Boolean(b) => serde_json::Value::Bool(*b),
        CellValue::Json(v) => v.clone(),
        CellValue::Binary(b) => serde_json::Value::String(hex_encode(b)),
        CellValue::DateTime(s) => serde_json::Value::String(s.clone()),
        CellValue::Uuid(s) => serde_json::Value::String(s.clone()),
        CellValue::Array(arr) => serde_json::Value::Array(arr.iter().map(cell_to_json).collect()),
    }
}

/// Quote a field if it contains `,` `"` or a newline (RFC 4180).
fn csv_escape_into(out: &mut String, field: &str) {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push_str("\"\"");
            } else {
                out.push(c);
            }
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}
