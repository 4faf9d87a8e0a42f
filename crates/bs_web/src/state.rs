use std::net::SocketAddr;
use bs_scraper::{ExtractionFailurePolicy, SummaryManager};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Surface the underlying error message on 500 responses
    pub verbose_errors: bool,
    pub extraction_policy: ExtractionFailurePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            verbose_errors: false,
            extraction_policy: ExtractionFailurePolicy::default(),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub manager: SummaryManager,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(manager: SummaryManager, config: ServerConfig) -> Self {
        Self {
            manager: manager.with_policy(config.extraction_policy),
            config,
        }
    }
}
