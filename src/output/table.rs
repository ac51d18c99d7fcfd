//! Aligned plain-text tables
//!
//! Column widths are measured in terminal cells (not bytes or chars) so
//! CJK and emoji content lines up.

use crate::db::types::{CellValue, QueryResults};
use unicode_truncate::UnicodeTruncateStr;
use unicode_width::UnicodeWidthStr;

/// Widest a single cell may render before it is cut
pub const MAX_CELL_WIDTH: usize = 60;

/// Printed instead of a table when a result has no rows
pub const NO_ROWS: &str = "No rows returned.";

/// Render results as a header, a rule, the rows and a row-count footer.
pub fn to_table(results: &QueryResults) -> String {
    if results.rows.is_empty() {
        return format!("{}\n", NO_ROWS);
    }

    let headers: Vec<String> = results.columns.iter().map(|c| cell_text(&c.name)).collect();
    let body: Vec<Vec<String>> = results
        .rows
        .iter()
        .map(|row| row.values.iter().map(render_cell).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let right_align: Vec<bool> = results
        .columns
        .iter()
        .map(|c| c.data_type.is_numeric())
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths, &vec![false; widths.len()]);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for row in &body {
        push_line(&mut out, row, &widths, &right_align);
    }

    out.push_str(&footer(results));
    out.push('\n');
    out
}

fn footer(results: &QueryResults) -> String {
    let n = results.row_count();
    let noun = if n == 1 { "row" } else { "rows" };
    if results.truncated {
        format!("({} {}, limited to {})", n, noun, n)
    } else {
        format!("({} {})", n, noun)
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], right_align: &[bool]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = " ".repeat(width.saturating_sub(cell.width()));
        if right_align.get(i).copied().unwrap_or(false) {
            line.push_str(&pad);
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&pad);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn render_cell(value: &CellValue) -> String {
    cell_text(&value.display_string())
}

/// Escape control characters and cap the display width.
fn cell_text(raw: &str) -> String {
    let escaped = raw
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    if escaped.width() <= MAX_CELL_WIDTH {
        return escaped;
    }
    let (head, _) = escaped.unicode_truncate(MAX_CELL_WIDTH - 1);
    format!("{}…", head)
}
