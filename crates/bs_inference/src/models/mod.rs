use std::sync::Arc;
use bs_core::{CompletionBackend, Error, Result};
use crate::Config;

pub mod dummy;
pub mod openrouter;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use dummy::DummyModel;
pub use openrouter::OpenRouterModel;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedModel;

/// Build the completion backend named by `config.model_name`.
/// Defaults to OpenRouter.
pub fn create_model(config: Option<Config>) -> Result<Arc<dyn CompletionBackend>> {
    let config = config.unwrap_or_default();
    let name = config
        .model_name
        .clone()
        .unwrap_or_else(|| "openrouter".to_string())
        .to_lowercase();

    match name.as_str() {
        "openrouter" => Ok(Arc::new(OpenRouterModel::new(&config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Inference(format!(
            "Unknown model '{}'. Available models: openrouter, dummy",
            other
        ))),
    }
}
