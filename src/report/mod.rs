//! Dashboard report assembly.
//!
//! This module turns a cleaned [`Table`](crate::ingest::Table) into a
//! serializable [`DashboardReport`](types::DashboardReport): one overview,
//! one section per detected categorical column, a spending section, and the
//! warnings collected along the way. [`html`] renders the result as a
//! self-contained page.

pub mod builder;
pub mod html;
pub mod types;

use anyhow::Result;
use tracing::debug;

use crate::clean::clean_table;
use crate::ingest::parse_table;
use crate::source::{DataSource, HttpClient};

pub use builder::{ReportOptions, build_report};
pub use types::DashboardReport;

/// Runs the whole pipeline for one source: load → parse → clean → build.
///
/// This is the single entry point both the CLI and the HTTP server use, so
/// a dashboard request and a one-shot report always agree.
pub async fn from_source<C: HttpClient>(
    client: &C,
    source: &DataSource,
    options: &ReportOptions,
) -> Result<DashboardReport> {
    let bytes = source.load(client).await?;
    let mut table = parse_table(&bytes)?;
    let summary = clean_table(&mut table);
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        conflict_rows = summary.conflict_rows,
        empty_rows = summary.empty_rows,
        "Table cleaned"
    );
    Ok(build_report(source.label(), &table, &summary, options))
}
