//! Envelope response format for all API responses.
//!
//! Every response carries a `success` flag. Successful responses wrap their
//! payload in `data` and, on the send pathway, may add `chatName` when
//! auto-naming fired; failures carry a `message` instead:
//! ```json
//! { "success": true, "data": { ... }, "chatName": "..." }
//! { "success": false, "message": "..." }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Envelope wrapping all API payloads.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// New chat name, present only when auto-naming fired on this request.
    #[serde(rename = "chatName", skip_serializing_if = "Option::is_none")]
    pub chat_name: Option<String>,

    /// Human-readable failure (or informational) message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            chat_name: None,
            message: None,
        }
    }

    /// Attach a chat name (no-op when `None`).
    pub fn with_chat_name(mut self, chat_name: Option<String>) -> Self {
        self.chat_name = chat_name;
        self
    }
}

impl ApiResponse<()> {
    /// Create a failure response with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            chat_name: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&self).unwrap_or_else(|_| {
            r#"{"success":false,"message":"Failed to serialize response"}"#.to_string()
        });

        (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
