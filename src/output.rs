//! Output formatting and persistence for dashboard reports.
//!
//! Supports pretty-printing, JSON logging, HTML page files, and CSV export
//! of the per-section frequency tables.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::report::DashboardReport;
use csv::WriterBuilder;
use std::path::{Path, PathBuf};

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DashboardReport) {
    debug!("{:#?}", report);
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &DashboardReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a rendered HTML page to `path`, creating parent directories as
/// needed.
pub fn write_html(path: &str, page: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, page).with_context(|| format!("writing dashboard to {path}"))?;
    info!(path, bytes = page.len(), "Dashboard page written");
    Ok(())
}

/// Exports each section's frequency table as `<dir>/<section id>_counts.csv`.
///
/// Files are overwritten on every export; one header row per file. Returns
/// the paths written.
pub fn export_counts_csv(dir: &str, report: &DashboardReport) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for section in &report.sections {
        let path = Path::new(dir).join(format!("{}_counts.csv", section.id));
        debug!(path = %path.display(), "Exporting frequency table");

        let mut writer = WriterBuilder::new().from_path(&path)?;
        for entry in &section.counts.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        written.push(path);
    }

    info!(files = written.len(), dir, "Frequency tables exported");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_table;
    use crate::ingest::parse_table;
    use crate::report::builder::{ReportOptions, build_report};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_report() -> DashboardReport {
        let csv = "payment_type,price\ncard,10\ncash,20\ncard,30\n";
        let mut table = parse_table(csv.as_bytes()).unwrap();
        let summary = clean_table(&mut table);
        build_report("sample.csv", &table, &summary, &ReportOptions::default())
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_write_html_creates_file() {
        let path = temp_path("sales_dash_test_page.html");
        let _ = fs::remove_file(&path); // clean up any prior run

        write_html(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_counts_csv() {
        let dir = temp_path("sales_dash_test_export");
        let _ = fs::remove_dir_all(&dir);

        let report = sample_report();
        let written = export_counts_csv(&dir, &report).unwrap();
        assert_eq!(written.len(), 1); // only the payment section exists

        let content = fs::read_to_string(&written[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "value,count");
        assert_eq!(lines[1], "card,2");
        assert_eq!(lines[2], "cash,1");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_overwrites_previous_run() {
        let dir = temp_path("sales_dash_test_export_overwrite");
        let _ = fs::remove_dir_all(&dir);

        let report = sample_report();
        export_counts_csv(&dir, &report).unwrap();
        let written = export_counts_csv(&dir, &report).unwrap();

        let content = fs::read_to_string(&written[0]).unwrap();
        // header appears exactly once even after a second export
        let header_count = content.lines().filter(|l| *l == "value,count").count();
        assert_eq!(header_count, 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
