//! CSV parsing into the in-memory [`Table`] the rest of the pipeline works on.

use anyhow::Result;
use csv::ReaderBuilder;

/// A parsed CSV: ordered header names plus row-major string cells.
///
/// Every row is normalized to the header width at parse time, so indexing a
/// cell by `(row, column)` is always in bounds.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates the cells of one column, top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[idx].as_str())
    }
}

/// Parses raw CSV bytes into a [`Table`].
///
/// Headers are trimmed; data rows may be ragged (short rows are padded with
/// empty cells, long rows truncated to the header width). Cells that are not
/// valid UTF-8 are converted lossily rather than rejected.
///
/// # Errors
///
/// Returns an error only when the `csv` reader cannot make sense of the
/// byte stream at all (e.g. unbalanced quoting).
pub fn parse_table(bytes: &[u8]) -> Result<Table> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let mut row: Vec<String> = record
            .iter()
            .take(width)
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(Table { columns, rows })
}
