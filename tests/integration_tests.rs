use sales_dash::clean::clean_table;
use sales_dash::ingest::parse_table;
use sales_dash::report::builder::{ReportOptions, build_report};
use sales_dash::report::html::render_page;
use sales_dash::report::{self, DashboardReport};
use sales_dash::source::{BasicClient, DataSource};

fn fixture_report() -> DashboardReport {
    let bytes = include_bytes!("fixtures/sample_sales.csv");
    let mut table = parse_table(bytes).expect("Failed to parse fixture");
    let summary = clean_table(&mut table);
    build_report("sample_sales.csv", &table, &summary, &ReportOptions::default())
}

#[test]
fn test_full_pipeline() {
    let report = fixture_report();

    // 14 raw data rows: 3 carry conflict markers, 1 is fully empty
    assert_eq!(report.overview.row_count, 10);
    assert_eq!(report.overview.conflict_rows_dropped, 3);
    assert_eq!(report.overview.empty_rows_dropped, 1);

    let ids: Vec<&str> = report.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["payment", "delivery", "category", "city"]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_fixture_frequency_sections() {
    let report = fixture_report();

    let payment = &report.sections[0];
    assert_eq!(payment.column, "payment_type");
    assert_eq!(payment.counts.total, 10);
    assert_eq!(payment.counts.entries[0].value, "credit_card");
    assert_eq!(payment.counts.entries[0].count, 6);

    let category = &report.sections[2];
    assert_eq!(category.counts.entries[0].value, "toys");
    assert_eq!(category.counts.entries[0].count, 5);
    // every section's counts sum to its total
    for section in &report.sections {
        let sum: usize = section.counts.entries.iter().map(|e| e.count).sum();
        assert_eq!(sum, section.counts.total);
    }
}

#[test]
fn test_fixture_spending_section() {
    let report = fixture_report();
    let spending = report.spending.expect("price column should be numeric");

    // 9 parseable prices; the nan cell is blanked, "1,299.00" parses
    assert_eq!(spending.overall.count, 9);
    assert_eq!(spending.overall.median, 89.5);
    assert_eq!(spending.overall.min, 19.99);
    assert_eq!(spending.overall.max, 1299.0);
    assert!((spending.overall.mean - 250.96).abs() < 0.01);

    assert_eq!(spending.by_city[0].group, "belo horizonte");
    assert_eq!(spending.by_city[0].mean, 1299.0);
    assert_eq!(spending.by_city.last().unwrap().group, "rio de janeiro");
    assert!((spending.gap().unwrap() - 1254.0).abs() < 0.01);
}

#[test]
fn test_fixture_page_renders_all_sections() {
    let report = fixture_report();
    let page = render_page(&report);

    for id in ["overview", "payment", "delivery", "category", "city", "spending"] {
        assert!(page.contains(&format!("id=\"{id}\"")), "missing section {id}");
    }
    assert!(page.contains("const report = {"));
    // conflict-marker rows must not leak into the rendered preview
    assert!(!page.contains("&lt;&lt;&lt;&lt;&lt;&lt;&lt;"));
}

#[tokio::test]
async fn test_from_source_reads_a_file_end_to_end() {
    let path = format!(
        "{}/sales_dash_integration_source.csv",
        std::env::temp_dir().display()
    );
    std::fs::write(&path, include_bytes!("fixtures/sample_sales.csv")).unwrap();

    let client = BasicClient::new();
    let source = DataSource::parse(&path);
    let report = report::from_source(&client, &source, &ReportOptions::default())
        .await
        .unwrap();

    assert_eq!(report.source, path);
    assert_eq!(report.overview.row_count, 10);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_report_without_recognizable_columns_degrades_to_warnings() {
    let mut table = parse_table(b"col_a,col_b\n1,2\n3,4\n").unwrap();
    let summary = clean_table(&mut table);
    let report = build_report("odd.csv", &table, &summary, &ReportOptions::default());

    assert!(report.sections.is_empty());
    assert!(report.spending.is_none());
    assert_eq!(report.warnings.len(), 5);

    // the page still renders, with the warnings inline
    let page = render_page(&report);
    assert!(page.contains("banner-warn"));
}
