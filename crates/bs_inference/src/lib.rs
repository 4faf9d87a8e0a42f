use std::time::Duration;

pub mod models;
pub mod pipeline;
pub mod prompts;

pub use bs_core::CompletionBackend;
pub use models::create_model;
pub use pipeline::{Event, PipelineState, SummaryPipeline};

/// How the pipeline reacts to rate limiting and temporary outages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub backoff: Duration,
    /// Number of full summarize-then-translate restarts allowed per request
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(3),
            max_retries: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    /// Backend implementation: `openrouter` or `dummy`
    pub model_name: Option<String>,
    /// Remote model identifier sent with each request
    pub model_id: Option<String>,
    pub base_url: Option<String>,
    pub retry: RetryPolicy,
}

pub mod prelude {
    pub use super::{Config, RetryPolicy};
    pub use super::models::create_model;
    pub use super::pipeline::SummaryPipeline;
    pub use bs_core::{BoundedText, CompletionBackend, CompletionError, PipelineError, Result, SummaryPair};
}
