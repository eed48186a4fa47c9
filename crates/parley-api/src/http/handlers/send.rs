//! Send-message endpoints: synchronous JSON and SSE reveal variants.
//!
//! POST /api/v1/chat/ai        - Send a prompt, get the full reply as JSON.
//! POST /api/v1/chat/ai/stream - Same pathway, but the reply is replayed as
//!                               paced `text_delta` SSE events after the
//!                               exchange is already persisted.
//!
//! Both variants run the identical send pathway in the chat service; the
//! stream variant only differs in presentation. The reveal is cosmetic --
//! dropping the SSE connection cancels the replay, never the stored
//! messages.

use std::convert::Infallible;
use std::pin::pin;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use parley_core::chat::service::SendRequest;
use parley_core::reveal::{RevealOptions, reveal_stream};
use parley_types::chat::{ChatMessage, MessageRole};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for both send variants.
///
/// Required fields are optional at the serde level so their absence maps to
/// the envelope's validation message rather than a deserializer rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub chat_id: Option<Uuid>,
    #[serde(default)]
    pub prompt: Option<String>,
    /// Image sources as base64 data URIs or URLs.
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Per-request chatflow override.
    #[serde(default)]
    pub chatflow_id: Option<String>,
}

impl SendMessageRequest {
    fn try_into_send(self) -> Result<SendRequest, AppError> {
        let chat_id = self
            .chat_id
            .ok_or_else(|| AppError::Validation("Chat id is required".to_string()))?;
        Ok(SendRequest {
            chat_id,
            // An absent prompt fails the same emptiness check as a blank one.
            prompt: self.prompt.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            chatflow_id: self.chatflow_id,
        })
    }
}

/// Wire shape of one message in send responses.
#[derive(Debug, Serialize)]
pub struct MessagePayload {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatMessage> for MessagePayload {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            timestamp: message.created_at,
        }
    }
}

/// POST /api/v1/chat/ai - Send a prompt and return the assistant reply.
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<SendMessageRequest>,
) -> Result<ApiResponse<MessagePayload>, AppError> {
    let outcome = state
        .chat_service
        .send_message(&user.user_id, body.try_into_send()?)
        .await?;

    Ok(ApiResponse::success(MessagePayload::from(&outcome.assistant))
        .with_chat_name(outcome.chat_name))
}

/// POST /api/v1/chat/ai/stream - Send a prompt, reveal the reply over SSE.
///
/// SSE event types:
/// - `message`    — the persisted user message (echo)
/// - `text_delta` — incremental reveal text: `{ "text": "..." }`
/// - `done`       — reveal complete: `{ "chatName": "..."? }`
///
/// Errors on the send pathway surface before the stream starts, as the
/// usual `{success: false, message}` response.
pub async fn send_message_stream(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<SendMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let outcome = state
        .chat_service
        .send_message(&user.user_id, body.try_into_send()?)
        .await?;

    let user_payload = serde_json::to_string(&MessagePayload::from(&outcome.user))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let done_payload = match &outcome.chat_name {
        Some(name) => serde_json::json!({ "chatName": name }).to_string(),
        None => "{}".to_string(),
    };
    let content = outcome.assistant.content;

    // Dropping the response (client disconnect) trips the token through the
    // guard, ending the reveal mid-text.
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let sse_stream = async_stream::stream! {
        let _guard = guard;

        yield Ok::<_, Infallible>(Event::default().event("message").data(user_payload));

        let mut chunks = pin!(reveal_stream(content, RevealOptions::default(), cancel));
        while let Some(chunk) = chunks.next().await {
            let data = serde_json::json!({ "text": chunk });
            yield Ok(Event::default().event("text_delta").data(data.to_string()));
        }

        yield Ok(Event::default().event("done").data(done_payload));
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
