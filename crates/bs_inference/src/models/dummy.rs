use std::fmt;
use async_trait::async_trait;
use bs_core::{CompletionBackend, CompletionError};

/// Offline backend that answers with the first words of the prompt body.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        // Prompts put the instruction first and the payload after a blank line
        let body = prompt.rsplit("\n\n").next().unwrap_or(prompt);
        let words: Vec<&str> = body.split_whitespace().take(20).collect();
        if words.is_empty() {
            return Err(CompletionError::transport("empty prompt"));
        }
        Ok(words.join(" "))
    }
}
