//! Chat CRUD HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/chat/create        - Create an empty chat
//! - GET    /api/v1/chat/list          - List the caller's chats
//! - GET    /api/v1/chat/{id}          - Get a chat with its messages
//! - PUT    /api/v1/chat/{id}/rename   - Rename a chat
//! - PUT    /api/v1/chat/{id}/chatflow - Update the chatflow association
//! - DELETE /api/v1/chat/{id}          - Delete a chat and its messages

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::chat::{Chat, ChatMessage};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid chat id: {s}")))
}

/// Request body for chat creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    #[serde(default)]
    pub chatflow_id: Option<String>,
}

/// POST /api/v1/chat/create - Create an empty chat with the default name.
pub async fn create_chat(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateChatRequest>,
) -> Result<ApiResponse<Chat>, AppError> {
    let chat = state
        .chat_service
        .create_chat(&user.user_id, body.chatflow_id)
        .await?;
    Ok(ApiResponse::success(chat))
}

/// GET /api/v1/chat/list - List the caller's chats, most recent first.
pub async fn list_chats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<ApiResponse<Vec<Chat>>, AppError> {
    let chats = state
        .chat_service
        .list_chats(&user.user_id, None, None)
        .await?;
    Ok(ApiResponse::success(chats))
}

/// A chat together with its ordered messages.
#[derive(Debug, Serialize)]
pub struct ChatWithMessages {
    #[serde(flatten)]
    pub chat: Chat,
    pub messages: Vec<ChatMessage>,
}

/// GET /api/v1/chat/{id} - Get a chat and its messages.
pub async fn get_chat(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> Result<ApiResponse<ChatWithMessages>, AppError> {
    let id = parse_uuid(&chat_id)?;
    let chat = state.chat_service.get_chat(&user.user_id, &id).await?;
    let messages = state.chat_service.get_messages(&user.user_id, &id).await?;
    Ok(ApiResponse::success(ChatWithMessages { chat, messages }))
}

/// Request body for renaming.
#[derive(Debug, Deserialize)]
pub struct RenameChatRequest {
    pub name: String,
}

/// PUT /api/v1/chat/{id}/rename - Rename a chat.
pub async fn rename_chat(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chat_id): Path<String>,
    Json(body): Json<RenameChatRequest>,
) -> Result<ApiResponse<Chat>, AppError> {
    let id = parse_uuid(&chat_id)?;
    let chat = state
        .chat_service
        .rename_chat(&user.user_id, &id, &body.name)
        .await?;
    Ok(ApiResponse::success(chat))
}

/// Request body for chatflow association updates. A null/absent id clears
/// the association.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChatflowRequest {
    #[serde(default)]
    pub chatflow_id: Option<String>,
}

/// PUT /api/v1/chat/{id}/chatflow - Update the chat's chatflow association.
pub async fn update_chatflow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chat_id): Path<String>,
    Json(body): Json<UpdateChatflowRequest>,
) -> Result<ApiResponse<Chat>, AppError> {
    let id = parse_uuid(&chat_id)?;
    let chat = state
        .chat_service
        .set_chatflow(&user.user_id, &id, body.chatflow_id)
        .await?;
    Ok(ApiResponse::success(chat))
}

/// DELETE /api/v1/chat/{id} - Delete a chat and its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let id = parse_uuid(&chat_id)?;
    state.chat_service.delete_chat(&user.user_id, &id).await?;
    Ok(ApiResponse::success(serde_json::json!({"deleted": true})))
}
