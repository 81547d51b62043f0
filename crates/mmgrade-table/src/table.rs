use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("table `{table}` has no column `{column}`")]
    MissingColumn { table: String, column: String },
    #[error("row {row} is out of range for table `{table}` ({rows} rows)")]
    RowOutOfRange { table: String, row: usize, rows: usize },
    #[error("column `{column}` has {len} rows where {expected} were expected")]
    RaggedColumn { column: String, len: usize, expected: usize },
}

/// A named, column-major table of transcript data.
///
/// Columns keep their original order; every column has the same length.
/// Cells are `serde_json::Value` so callers can hand over whatever their
/// source produced — CSV ingestion yields strings throughout.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    cells: HashMap<String, Vec<Value>>,
    rows: usize,
}

impl Table {
    /// Build a table from ordered `(header, values)` pairs.
    /// Columns of unequal length are rejected.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<(String, Vec<Value>)>,
    ) -> Result<Self, TableError> {
        let mut headers = Vec::with_capacity(columns.len());
        let mut cells = HashMap::with_capacity(columns.len());
        let mut rows = None;
        for (header, values) in columns {
            let expected = *rows.get_or_insert(values.len());
            if values.len() != expected {
                return Err(TableError::RaggedColumn {
                    column: header,
                    len: values.len(),
                    expected,
                });
            }
            headers.push(header.clone());
            cells.insert(header, values);
        }
        Ok(Self {
            name: name.into(),
            headers,
            cells,
            rows: rows.unwrap_or(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column headers in their original order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column(&self, name: &str) -> Result<&[Value], TableError> {
        self.cells
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| TableError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    pub fn cell(&self, column: &str, row: usize) -> Result<&Value, TableError> {
        let values = self.column(column)?;
        values.get(row).ok_or(TableError::RowOutOfRange {
            table: self.name.clone(),
            row,
            rows: self.rows,
        })
    }
}

/// Coerce a ground-truth cell to an answer index.
///
/// Accepts integers, integral floats, and numeric strings (pandas CSV
/// round-trips store `3` as `"3"` or `"3.0"`). Everything else is `None`.
pub fn cell_as_index(cell: &Value) -> Option<i64> {
    match cell {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}
