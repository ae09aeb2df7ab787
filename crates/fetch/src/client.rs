//! Blocking HTTP transport for the vendor catalog.

use std::time::Duration;

use partcheck_engine::Document;

const USER_AGENT: &str = concat!("partcheck/", env!("CARGO_PKG_VERSION"));

/// Error type for transport operations. An HTTP error status is not a
/// transport error — the document is returned with its status and the
/// extractor decides what to do with it.
#[derive(Debug)]
pub enum FetchError {
    /// Network failure (DNS, connect, timeout, aborted body read).
    Network(String),
    /// The identifier is empty after trimming.
    EmptyId,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Netzwerkfehler: {msg}"),
            FetchError::EmptyId => write!(f, "leere Artikelnummer"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Catalog product-page client (blocking, no Tokio runtime required).
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches(' ').to_string(),
        }
    }

    /// Product page URL for an identifier: configured base + trimmed id.
    pub fn product_url(&self, id: &str) -> String {
        format!("{}{}", self.base_url, id.trim())
    }

    /// Retrieve one product document. Succeeds for any HTTP status the
    /// server actually answered with.
    pub fn get_product(&self, id: &str) -> Result<Document, FetchError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(FetchError::EmptyId);
        }

        let resp = self
            .http
            .get(self.product_url(id))
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Document { status, body })
    }
}
