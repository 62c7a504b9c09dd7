//! HTTP dashboard server.
//!
//! The data is re-read and the whole pipeline re-runs on every request, so
//! the page always reflects the CSV as it currently exists. Pipeline
//! failures render as an inline error page, never a crash.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::report::html::{render_error_page, render_page};
use crate::report::{self, DashboardReport, ReportOptions};
use crate::source::{BasicClient, DataSource};

/// Everything the server needs, fixed at startup.
pub struct ServeConfig {
    pub source: DataSource,
    pub options: ReportOptions,
}

struct AppState {
    config: ServeConfig,
    client: BasicClient,
}

/// Binds `addr` and serves the dashboard until the process is stopped.
pub async fn serve(addr: &str, config: ServeConfig) -> Result<()> {
    let state = Arc::new(AppState {
        config,
        client: BasicClient::new(),
    });

    let app = Router::new()
        .route("/", get(dashboard))
        .route("/report.json", get(report_json))
        .route("/healthz", get(healthz))
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Dashboard server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build(state: &AppState) -> Result<DashboardReport> {
    report::from_source(&state.client, &state.config.source, &state.config.options).await
}

/// `GET /` — the dashboard page. Errors are cosmetic: the visitor gets an
/// error banner and the next request tries again.
async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    match build(&state).await {
        Ok(report) => Html(render_page(&report)),
        Err(e) => {
            error!(error = %e, "Dashboard render failed");
            Html(render_error_page(
                state.config.source.label(),
                &format!("{e:#}"),
            ))
        }
    }
}

/// `GET /report.json` — the raw report for anything that isn't a browser.
async fn report_json(State(state): State<Arc<AppState>>) -> Response {
    match build(&state).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!(error = %e, "Report build failed");
            let body = serde_json::json!({ "error": format!("{e:#}") });
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}
