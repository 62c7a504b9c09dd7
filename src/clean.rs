//! Defensive cleaning for ad hoc sales exports.
//!
//! The CSVs this tool sees in the wild carry whitespace padding, assorted
//! spellings of "missing", stray Git merge-conflict markers, and columns
//! that are numeric in spirit but text in practice. Cleaning normalizes all
//! of that in place before any aggregation runs.

use serde::Serialize;

use crate::ingest::Table;

/// Prefixes left behind by an unresolved Git merge. A row containing a cell
/// that starts with one of these is treated as an artifact, not data.
pub const CONFLICT_MARKERS: [&str; 3] = ["<<<<<<<", "=======", ">>>>>>>"];

/// Case-insensitive cell values treated as missing data.
const BLANK_ALIASES: [&str; 6] = ["nan", "null", "none", "na", "n/a", "-"];

/// Minimum share of non-empty cells that must parse as numbers for a column
/// to be profiled [`ColumnKind::Numeric`].
pub const NUMERIC_THRESHOLD: f64 = 0.7;

/// What got removed or rewritten during [`clean_table`].
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct CleanSummary {
    pub conflict_rows: usize,
    pub empty_rows: usize,
    pub blanked_cells: usize,
}

/// Normalizes a raw cell: trims whitespace and maps blank aliases to `""`.
pub fn normalize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if BLANK_ALIASES
        .iter()
        .any(|alias| trimmed.eq_ignore_ascii_case(alias))
    {
        return String::new();
    }
    trimmed.to_string()
}

fn is_conflict_cell(cell: &str) -> bool {
    CONFLICT_MARKERS.iter().any(|m| cell.starts_with(m))
}

/// Cleans a table in place: normalizes cells, drops conflict-marker rows,
/// drops rows that end up fully empty. Returns what was removed.
pub fn clean_table(table: &mut Table) -> CleanSummary {
    let mut summary = CleanSummary::default();
    let mut kept = Vec::with_capacity(table.rows.len());

    for row in table.rows.drain(..) {
        if row.iter().any(|cell| is_conflict_cell(cell.trim())) {
            summary.conflict_rows += 1;
            continue;
        }

        let mut cleaned = Vec::with_capacity(row.len());
        for cell in &row {
            let normalized = normalize_cell(cell);
            if normalized.is_empty() && !cell.is_empty() {
                summary.blanked_cells += 1;
            }
            cleaned.push(normalized);
        }

        if cleaned.iter().all(String::is_empty) {
            summary.empty_rows += 1;
            continue;
        }

        kept.push(cleaned);
    }

    table.rows = kept;
    summary
}

/// How a column's values behave after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Numeric,
}

/// Per-column shape derived from the cleaned cells.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub non_empty: usize,
    pub numeric_cells: usize,
}

/// Attempts to read a cleaned cell as a number.
///
/// Thousands separators are stripped first, so `"1,234.5"` parses. Empty
/// cells yield `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    let candidate: String = cell.chars().filter(|c| *c != ',').collect();
    candidate.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Profiles every column of a cleaned table.
///
/// A column is `Numeric` when at least [`NUMERIC_THRESHOLD`] of its
/// non-empty cells parse; a column with no data at all stays `Text`.
pub fn profile_columns(table: &Table) -> Vec<ColumnProfile> {
    (0..table.column_count())
        .map(|idx| {
            let mut non_empty = 0usize;
            let mut numeric_cells = 0usize;
            for cell in table.column_values(idx) {
                if cell.is_empty() {
                    continue;
                }
                non_empty += 1;
                if parse_number(cell).is_some() {
                    numeric_cells += 1;
                }
            }

            let kind = if non_empty > 0
                && numeric_cells as f64 >= non_empty as f64 * NUMERIC_THRESHOLD
            {
                ColumnKind::Numeric
            } else {
                ColumnKind::Text
            };

            ColumnProfile {
                name: table.columns[idx].clone(),
                kind,
                non_empty,
                numeric_cells,
            }
        })
        .collect()
}

/// Numeric view of one column: `None` for empty or unparseable cells.
pub fn numeric_view(table: &Table, idx: usize) -> Vec<Option<f64>> {
    table.column_values(idx).map(parse_number).collect()
}
