use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use bs_core::{ExtractionError, Result};

const USER_AGENT: &str = concat!("bs-summariser/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Download the page at `url` and return its body as HTML text
    async fn fetch(&self, url: &str) -> std::result::Result<String, ExtractionError>;
}

/// Plain GET over HTTP(S). The body is treated as HTML whatever its
/// declared content type, and non-2xx pages are handed back as-is.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, ExtractionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!("Fetching {} returned {}", url, response.status());
        }

        response
            .text()
            .await
            .map_err(|e| ExtractionError::FetchFailed(e.to_string()))
    }
}

/// Serves pages from memory; unknown URLs fail like an unreachable host.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, ExtractionError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ExtractionError::FetchFailed(format!("no page registered for {}", url)))
    }
}
