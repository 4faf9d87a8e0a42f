use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use bs_core::{Error, ExtractionError};

const GENERIC_MESSAGE: &str = "Something went wrong.";

/// A failed request as the client sees it.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn invalid_url() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid URL".to_string(),
        }
    }

    pub fn from_error(error: &Error, verbose: bool) -> Self {
        let status = match error {
            Error::InvalidUrl(_) => return Self::invalid_url(),
            Error::Extraction(ExtractionError::FetchFailed(_)) => StatusCode::BAD_GATEWAY,
            Error::Extraction(ExtractionError::InsufficientContent) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if verbose || status != StatusCode::INTERNAL_SERVER_ERROR {
            error.to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        };

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}
