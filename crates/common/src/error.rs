use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Common error types used across the application.
///
/// Collaborator failures (`Store`, `Transport`, `Http`) are fatal to the
/// invocation that hit them — the hosting infrastructure sees a 5xx and may
/// retry per its own policy. Nothing here retries internally.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document store error: {0}")]
    Store(String),

    #[error("Push transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Store(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Transport(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Http(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
