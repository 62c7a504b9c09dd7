//! CLI entry point for the sales dashboard tool.
//!
//! Provides subcommands for rendering a one-shot dashboard page, serving it
//! over HTTP, and inspecting what the column sniffer and aggregators make
//! of a CSV.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use sales_dash::output::{export_counts_csv, print_json, print_pretty, write_html};
use sales_dash::report::html::render_page;
use sales_dash::report::{self, ReportOptions};
use sales_dash::server::{ServeConfig, serve};
use sales_dash::source::{BasicClient, DataSource};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sales_dash")]
#[command(about = "A tool to analyze sales CSVs and render a dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a one-shot dashboard page from a CSV file or URL
    Report {
        /// Path to file or URL to fetch (falls back to $SALES_CSV)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// HTML file to write the page to
        #[arg(short, long, default_value = "dashboard.html")]
        output: String,

        /// How many entries the pie/scatter charts keep for wide columns
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// How many raw rows the preview table shows
        #[arg(long, default_value_t = 20)]
        preview: usize,
    },
    /// Serve the dashboard over HTTP, re-reading the CSV on every request
    Serve {
        /// Path to file or URL to fetch (falls back to $SALES_CSV)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        addr: String,

        /// How many entries the pie/scatter charts keep for wide columns
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// How many raw rows the preview table shows
        #[arg(long, default_value_t = 20)]
        preview: usize,
    },
    /// Log detected columns and aggregates without rendering a page
    Inspect {
        /// Path to file or URL to fetch (falls back to $SALES_CSV)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Log the full report as pretty JSON instead of debug format
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Directory to export per-section frequency CSVs to
        #[arg(long)]
        export_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sales_dash.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_dash.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            output,
            top,
            preview,
        } => {
            let source = resolve_source(source)?;
            let options = ReportOptions {
                top_n: top,
                preview_rows: preview,
            };

            let client = BasicClient::new();
            let report = report::from_source(&client, &source, &options).await?;
            write_html(&output, &render_page(&report))?;

            info!(
                source = source.label(),
                output = %output,
                sections = report.sections.len(),
                warnings = report.warnings.len(),
                "Dashboard rendered"
            );
        }
        Commands::Serve {
            source,
            addr,
            top,
            preview,
        } => {
            let source = resolve_source(source)?;
            let config = ServeConfig {
                source,
                options: ReportOptions {
                    top_n: top,
                    preview_rows: preview,
                },
            };
            serve(&addr, config).await?;
        }
        Commands::Inspect {
            source,
            json,
            export_dir,
        } => {
            let source = resolve_source(source)?;
            let client = BasicClient::new();
            let report = report::from_source(&client, &source, &ReportOptions::default()).await?;

            if json {
                print_json(&report)?;
            } else {
                print_pretty(&report);
            }

            for warning in &report.warnings {
                info!(warning = %warning, "Report warning");
            }

            if let Some(dir) = export_dir {
                let written = export_counts_csv(&dir, &report)?;
                for path in &written {
                    info!(path = %path.display(), "Exported");
                }
            }
        }
    }

    Ok(())
}

/// Resolves the CSV source from the CLI argument or the `SALES_CSV`
/// environment variable.
fn resolve_source(arg: Option<String>) -> Result<DataSource> {
    let raw = match arg {
        Some(raw) => raw,
        None => match std::env::var("SALES_CSV") {
            Ok(raw) => raw,
            Err(_) => bail!("no CSV source given and SALES_CSV is not set"),
        },
    };
    Ok(DataSource::parse(&raw))
}
