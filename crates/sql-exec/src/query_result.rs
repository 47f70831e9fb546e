//! `QueryResult`: the value `SQLExec::execute` returns, and its `|`-table
//! rendering (spec §4.5, §9 "raw-pointer leaks in the source", §11).

use std::fmt;
use storage_api::value::{ColumnAttribute, Row, Value};

/// Owns its column-name list, column-attribute list and row list outright —
/// no shared/borrowed state survives past the call that produced it (spec
/// §9: the source's raw-pointer `QueryResult` replaced by plain ownership).
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub column_names: Vec<String>,
    pub column_attributes: Vec<ColumnAttribute>,
    pub rows: Vec<Row>,
    pub message: String,
}

impl QueryResult {
    /// A result with no row data, just a trailing message (e.g. `created t`).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            column_names: Vec::new(),
            column_attributes: Vec::new(),
            rows: Vec::new(),
            message: message.into(),
        }
    }

    pub fn with_rows(
        column_names: Vec<String>,
        column_attributes: Vec<ColumnAttribute>,
        rows: Vec<Row>,
    ) -> Self {
        let message = format!("successfully returned {} rows", rows.len());
        Self {
            column_names,
            column_attributes,
            rows,
            message,
        }
    }

    fn render_value(value: Option<&Value>) -> String {
        match value {
            Some(Value::Int(n)) => n.to_string(),
            Some(Value::Text(s)) => format!("\"{s}\""),
            Some(Value::Boolean(b)) => b.to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.column_names.is_empty() {
            let cells: Vec<Vec<String>> = self
                .rows
                .iter()
                .map(|row| {
                    self.column_names
                        .iter()
                        .map(|c| Self::render_value(row.get(c)))
                        .collect()
                })
                .collect();

            let widths: Vec<usize> = self
                .column_names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    cells
                        .iter()
                        .map(|row| row[i].len())
                        .chain(std::iter::once(name.len()))
                        .max()
                        .unwrap_or(0)
                })
                .collect();

            let header: Vec<String> = self
                .column_names
                .iter()
                .zip(&widths)
                .map(|(name, w)| format!("{name:<w$}"))
                .collect();
            writeln!(f, "{}", header.join(" | "))?;

            let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            writeln!(f, "{}", separator.join("-+-"))?;

            for row in &cells {
                let line: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(v, w)| format!("{v:<w$}"))
                    .collect();
                writeln!(f, "{}", line.join(" | "))?;
            }
        }
        write!(f, "{}", self.message)
    }
}
