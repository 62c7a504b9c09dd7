//! Builds a [`DashboardReport`] from a cleaned table.

use tracing::warn;

use crate::clean::{CleanSummary, ColumnKind, ColumnProfile, numeric_view, profile_columns};
use crate::ingest::Table;
use crate::report::types::{
    CategorySection, ColumnInfo, DashboardReport, Overview, SpendingSection,
};
use crate::sniff::{Role, SniffedColumns, sniff_columns};
use crate::stats::{FrequencyTable, NumericSummary, mean_by_group};

/// Knobs for report assembly.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// How many entries the pie/scatter head keeps for wide columns.
    pub top_n: usize,
    /// How many raw rows the overview preview shows.
    pub preview_rows: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: 5,
            preview_rows: 20,
        }
    }
}

/// Assembles the full report. Never fails: anything that cannot be
/// aggregated becomes a warning and its section is left out.
pub fn build_report(
    source: &str,
    table: &Table,
    summary: &CleanSummary,
    options: &ReportOptions,
) -> DashboardReport {
    let profiles = profile_columns(table);
    let sniffed = sniff_columns(&table.columns);
    let mut warnings = Vec::new();

    let columns = profiles
        .iter()
        .enumerate()
        .map(|(idx, profile)| ColumnInfo {
            name: profile.name.clone(),
            kind: profile.kind,
            non_empty: profile.non_empty,
            roles: sniffed
                .roles_for(idx)
                .into_iter()
                .map(|role| role.label().to_string())
                .collect(),
        })
        .collect();

    let overview = Overview {
        row_count: table.row_count(),
        column_count: table.column_count(),
        conflict_rows_dropped: summary.conflict_rows,
        empty_rows_dropped: summary.empty_rows,
        columns,
        preview_columns: table.columns.clone(),
        preview_rows: table
            .rows
            .iter()
            .take(options.preview_rows)
            .cloned()
            .collect(),
    };

    let mut sections = Vec::new();
    for role in [Role::Payment, Role::Delivery, Role::Category, Role::City] {
        if let Some(section) = categorical_section(table, &sniffed, role, options, &mut warnings) {
            sections.push(section);
        }
    }

    let spending = spending_section(table, &sniffed, &profiles, &mut warnings);

    DashboardReport {
        generated_at: chrono::Utc::now(),
        source: source.to_string(),
        overview,
        sections,
        spending,
        warnings,
    }
}

fn section_meta(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Payment => ("payment", "Payment Methods"),
        Role::Delivery => ("delivery", "Delivery Status"),
        Role::Category => ("category", "Product Categories"),
        Role::City => ("city", "Cities"),
        Role::Price => ("spending", "Average Customer Spending"),
    }
}

fn categorical_section(
    table: &Table,
    sniffed: &SniffedColumns,
    role: Role,
    options: &ReportOptions,
    warnings: &mut Vec<String>,
) -> Option<CategorySection> {
    let (id, title) = section_meta(role);

    let Some(idx) = sniffed.get(role) else {
        push_warning(
            warnings,
            format!("No column matching {} found; section skipped", role.label()),
        );
        return None;
    };

    let column = table.columns[idx].clone();
    let counts = FrequencyTable::from_values(table.column_values(idx));
    if counts.is_empty() {
        push_warning(
            warnings,
            format!("Column '{column}' has no values after cleaning; section skipped"),
        );
        return None;
    }

    // Product categories and cities can have hundreds of distinct values;
    // their detail charts only show the top slice, as the source dashboards
    // did. Payment and delivery columns are small enough to chart whole.
    let (scatter, pie) = match role {
        Role::Payment => (counts.entries.clone(), None),
        Role::Delivery => (counts.entries.clone(), Some(counts.entries.clone())),
        _ => (
            counts.head(options.top_n),
            Some(counts.head(options.top_n)),
        ),
    };

    Some(CategorySection {
        id: id.to_string(),
        title: title.to_string(),
        column,
        counts,
        scatter,
        pie,
    })
}

fn spending_section(
    table: &Table,
    sniffed: &SniffedColumns,
    profiles: &[ColumnProfile],
    warnings: &mut Vec<String>,
) -> Option<SpendingSection> {
    let Some(price_idx) = sniffed.price else {
        push_warning(
            warnings,
            "No column matching price found; spending section skipped".to_string(),
        );
        return None;
    };

    let price_column = table.columns[price_idx].clone();
    if profiles[price_idx].kind != ColumnKind::Numeric {
        push_warning(
            warnings,
            format!("Column '{price_column}' is not numeric; spending section skipped"),
        );
        return None;
    }

    let view = numeric_view(table, price_idx);
    let overall = NumericSummary::from_values(&view);
    if overall.count == 0 {
        push_warning(
            warnings,
            format!("Column '{price_column}' has no numeric values; spending section skipped"),
        );
        return None;
    }

    let (city_column, by_city) = match sniffed.city {
        Some(city_idx) => (
            Some(table.columns[city_idx].clone()),
            mean_by_group(table.column_values(city_idx), &view),
        ),
        None => {
            push_warning(
                warnings,
                "No column matching city found; per-city spending skipped".to_string(),
            );
            (None, Vec::new())
        }
    };

    Some(SpendingSection {
        price_column,
        overall,
        city_column,
        by_city,
    })
}

fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_table;
    use crate::ingest::parse_table;

    const SAMPLE: &str = "\
order_id,payment_type,delivered_on_time,product_category_name_english,seller_city,price
1,credit_card,yes,toys,sao paulo,10.0
2,boleto,no,toys,rio,20.0
3,credit_card,yes,housewares,sao paulo,30.0
4,credit_card,yes,toys,curitiba,15.0
";

    fn build(csv: &str) -> DashboardReport {
        let mut table = parse_table(csv.as_bytes()).unwrap();
        let summary = clean_table(&mut table);
        build_report("test.csv", &table, &summary, &ReportOptions::default())
    }

    #[test]
    fn test_full_report_has_all_sections() {
        let report = build(SAMPLE);
        let ids: Vec<&str> = report.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["payment", "delivery", "category", "city"]);
        assert!(report.spending.is_some());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_counts_sum_to_row_count() {
        let report = build(SAMPLE);
        for section in &report.sections {
            let sum: usize = section.counts.entries.iter().map(|e| e.count).sum();
            assert_eq!(sum, section.counts.total);
            assert_eq!(sum, 4);
        }
    }

    #[test]
    fn test_payment_section_shape() {
        let report = build(SAMPLE);
        let payment = &report.sections[0];
        assert_eq!(payment.column, "payment_type");
        assert_eq!(payment.counts.entries[0].value, "credit_card");
        assert_eq!(payment.counts.entries[0].count, 3);
        assert!(payment.pie.is_none());
        assert_eq!(payment.scatter.len(), payment.counts.entries.len());
    }

    #[test]
    fn test_category_section_uses_top_head() {
        let mut csv = String::from("product_category_name_english\n");
        for i in 0..8 {
            // 8 distinct categories with descending frequency
            for _ in 0..(8 - i) {
                csv.push_str(&format!("cat{i}\n"));
            }
        }
        let report = build(&csv);
        let category = report.sections.iter().find(|s| s.id == "category").unwrap();
        assert_eq!(category.counts.entries.len(), 8);
        assert_eq!(category.scatter.len(), 5);
        assert_eq!(category.pie.as_ref().unwrap().len(), 5);
    }

    #[test]
    fn test_missing_columns_become_warnings() {
        let report = build("order_id,price\n1,10\n2,20\n");
        assert!(report.sections.is_empty());
        assert!(report.spending.is_some());
        // payment, delivery, category, city + per-city spending
        assert_eq!(report.warnings.len(), 5);
        assert!(report.warnings[0].contains("payment method"));
    }

    #[test]
    fn test_text_price_column_skips_spending() {
        let report = build("price\ncheap\nexpensive\nmid\n");
        assert!(report.spending.is_none());
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.contains("is not numeric"))
        );
    }

    #[test]
    fn test_spending_stats() {
        let report = build(SAMPLE);
        let spending = report.spending.unwrap();
        assert_eq!(spending.overall.count, 4);
        assert_eq!(spending.overall.mean, 18.75);
        assert_eq!(spending.overall.min, 10.0);
        assert_eq!(spending.overall.max, 30.0);

        // sao paulo mean 20, rio 20, curitiba 15 → tie broken by name
        assert_eq!(spending.by_city[0].group, "rio");
        assert_eq!(spending.by_city[1].group, "sao paulo");
        assert_eq!(spending.by_city[2].group, "curitiba");
        assert_eq!(spending.gap(), Some(5.0));
    }

    #[test]
    fn test_preview_is_bounded() {
        let mut csv = String::from("payment_type\n");
        for _ in 0..50 {
            csv.push_str("card\n");
        }
        let report = build(&csv);
        assert_eq!(report.overview.row_count, 50);
        assert_eq!(report.overview.preview_rows.len(), 20);
    }
}
