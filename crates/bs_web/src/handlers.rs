use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use bs_core::PipelineResult;
use crate::error::ApiError;
use crate::AppState;

/// Pull a usable URL out of the request body. Anything other than a
/// non-blank string under `url` is rejected.
fn requested_url(payload: Result<Json<Value>, JsonRejection>) -> Option<String> {
    let Json(body) = payload.ok()?;
    body.get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

pub async fn summarise(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PipelineResult>, ApiError> {
    let Some(url) = requested_url(payload) else {
        tracing::debug!("Rejected summarise request without a valid url");
        return Err(ApiError::invalid_url());
    };

    match state.manager.summarise_url(&url).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!("❌ Summarising {} failed: {}", url, e);
            Err(ApiError::from_error(&e, state.config.verbose_errors))
        }
    }
}
