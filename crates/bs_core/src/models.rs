use async_trait::async_trait;
use std::fmt;

use crate::error::CompletionError;

#[async_trait]
pub trait CompletionBackend: Send + Sync + fmt::Debug {
    /// Name used in log lines
    fn name(&self) -> &str;

    /// Send a single-turn prompt and return the model's reply text
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}
