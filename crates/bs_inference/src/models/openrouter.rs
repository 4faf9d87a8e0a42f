use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use bs_core::{CompletionBackend, CompletionError, Error, Result};
use crate::Config;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemma-3-27b-it:free";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl ChatResponse {
    /// First choice's content, else the provider's error message.
    fn into_reply(self) -> Option<String> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty());

        content.or_else(|| self.error.map(|e| e.message).filter(|m| !m.is_empty()))
    }
}

/// Chat-completion client for OpenRouter and other OpenAI-compatible APIs.
pub struct OpenRouterModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterModel {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Inference("OpenRouter API key is required".to_string()))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: config.model_id.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for OpenRouterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterModel {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::new(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::transport(format!("failed to read completion response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .map(|e| e.message)
                .unwrap_or_else(|| format!("completion backend returned {}", status));
            tracing::debug!("Completion request failed with {}: {}", status, message);
            return Err(CompletionError::with_status(status.as_u16(), message));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::transport(format!("invalid completion response: {}", e)))?;

        parsed
            .into_reply()
            .ok_or_else(|| CompletionError::transport("no response from completion backend"))
    }
}
