use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Missing X-API-Key header")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            Self::MissingApiKey => {
                tracing::debug!("Missing API key");
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Missing X-API-Key header" }))).into_response()
            }
            Self::InvalidApiKey => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": "Invalid API key" }))).into_response()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "Unexpected error");
                internal_error_response(&e.to_string())
            }
        }
    }
}

/// Builds the 500 body used for unhandled failures, including recovered panics.
pub fn internal_error_response(message: &str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false, "error": message }))).into_response()
}
