//! Reference document fetching.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use thiserror::Error;

/// Document fetch errors.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Reference source returned status {0}")]
    Status(u16),

    #[error("No document for {0}")]
    NotFound(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Source of reference HTML documents.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> FetchResult<String>;
}

/// HTTPS fetcher with a bounded timeout.
pub struct HttpDocumentFetcher {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpDocumentFetcher {
    pub fn new(timeout_secs: u64) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("drug-food/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl DocumentFetcher for HttpDocumentFetcher {
    fn fetch(&self, url: &str) -> FetchResult<String> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .map_err(|e| FetchError::HttpClient(e.to_string()))
    }
}

/// Fetcher serving fixed documents by URL (fixtures, offline runs).
#[derive(Default)]
pub struct FixtureFetcher {
    documents: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, html: &str) -> Self {
        self.documents.insert(url.to_string(), html.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentFetcher for FixtureFetcher {
    fn fetch(&self, url: &str) -> FetchResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
