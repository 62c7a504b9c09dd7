//! Serializable shapes for the dashboard report.
//!
//! Everything here goes straight into the page's embedded JSON blob (and
//! out of `/report.json`), so field names are part of the page contract.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clean::ColumnKind;
use crate::stats::{FrequencyEntry, FrequencyTable, GroupMean, NumericSummary};

/// Complete result of one load→clean→sniff→aggregate pass.
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub overview: Overview,
    pub sections: Vec<CategorySection>,
    pub spending: Option<SpendingSection>,
    pub warnings: Vec<String>,
}

/// Dataset-level facts shown at the top of the page.
#[derive(Debug, Serialize)]
pub struct Overview {
    pub row_count: usize,
    pub column_count: usize,
    pub conflict_rows_dropped: usize,
    pub empty_rows_dropped: usize,
    pub columns: Vec<ColumnInfo>,
    pub preview_columns: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
}

/// One column as the profiler and sniffer saw it.
#[derive(Debug, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub non_empty: usize,
    pub roles: Vec<String>,
}

/// Frequency breakdown of one detected categorical column, with the data
/// each chart draws from already selected.
#[derive(Debug, Serialize)]
pub struct CategorySection {
    /// Stable id used for anchors and chart element ids.
    pub id: String,
    pub title: String,
    /// Name of the column that was matched.
    pub column: String,
    pub counts: FrequencyTable,
    /// Points for the scatter chart (full set or a top-N head).
    pub scatter: Vec<FrequencyEntry>,
    /// Slices for the pie chart, when this section draws one.
    pub pie: Option<Vec<FrequencyEntry>>,
}

/// Price statistics, overall and per city.
#[derive(Debug, Serialize)]
pub struct SpendingSection {
    pub price_column: String,
    pub overall: NumericSummary,
    pub city_column: Option<String>,
    pub by_city: Vec<GroupMean>,
}

impl SpendingSection {
    /// Gap between the highest and lowest per-city mean, when at least one
    /// city is present.
    pub fn gap(&self) -> Option<f64> {
        let first = self.by_city.first()?;
        let last = self.by_city.last()?;
        Some(first.mean - last.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spending_gap() {
        let section = SpendingSection {
            price_column: "price".to_string(),
            overall: NumericSummary::default(),
            city_column: Some("seller_city".to_string()),
            by_city: vec![
                GroupMean {
                    group: "sp".to_string(),
                    mean: 30.0,
                    count: 2,
                },
                GroupMean {
                    group: "rio".to_string(),
                    mean: 10.0,
                    count: 1,
                },
            ],
        };
        assert_eq!(section.gap(), Some(20.0));
    }

    #[test]
    fn test_spending_gap_empty() {
        let section = SpendingSection {
            price_column: "price".to_string(),
            overall: NumericSummary::default(),
            city_column: None,
            by_city: vec![],
        };
        assert_eq!(section.gap(), None);
    }
}
