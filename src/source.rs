//! Where the sales CSV comes from: a local file or an HTTP(S) URL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};
use tracing::debug;

/// Minimal HTTP seam so URL loading can be faked in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Production [`HttpClient`] backed by a plain [`reqwest::Client`].
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// A resolved CSV location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(String),
    Url(String),
}

impl DataSource {
    /// Classifies a raw source string by its scheme prefix.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::Path(raw.to_string())
        }
    }

    /// Human-readable label used in page titles and warnings.
    pub fn label(&self) -> &str {
        match self {
            Self::Path(p) | Self::Url(p) => p,
        }
    }

    /// Reads the raw CSV bytes, from disk or over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or the HTTP request
    /// fails; the caller decides whether that is fatal or a page banner.
    pub async fn load<C: HttpClient>(&self, client: &C) -> Result<Vec<u8>> {
        match self {
            Self::Path(path) => {
                debug!(path, "Reading CSV from disk");
                std::fs::read(path).with_context(|| format!("reading CSV file {path}"))
            }
            Self::Url(url) => {
                debug!(url, "Fetching CSV over HTTP");
                let req = Request::new(reqwest::Method::GET, url.parse()?);
                let resp = client
                    .execute(req)
                    .await
                    .with_context(|| format!("fetching CSV from {url}"))?;
                let resp = resp.error_for_status()?;
                Ok(resp.bytes().await?.to_vec())
            }
        }
    }
}
