//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Upstream engine failures are reported to the caller as a generic
//! message; the status line and body stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use parley_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat pathway errors (send, CRUD, chatflow listing).
    Chat(ChatError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Chat(ChatError::NotFound) => {
                (StatusCode::NOT_FOUND, "Chat not found".to_string())
            }
            AppError::Chat(ChatError::EmptyPrompt) => {
                (StatusCode::BAD_REQUEST, "Prompt is required".to_string())
            }
            AppError::Chat(ChatError::MissingChatflow) => (
                StatusCode::BAD_REQUEST,
                "No chatflow is configured for this chat".to_string(),
            ),
            AppError::Chat(ChatError::InvalidName(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Chat(ChatError::Chatflow(e)) => {
                error!(error = %e, "chatflow engine call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "An error occurred while processing your request".to_string(),
                )
            }
            AppError::Chat(ChatError::Repository(e)) => {
                error!(error = %e, "repository operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request".to_string(),
                )
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
