//! Chatflow listing handler.
//!
//! GET /api/v1/chatflows - Proxy the engine's chatflow listing, reshaped
//! and filtered by the configured allow-list.

use axum::extract::State;

use parley_types::chatflow::ChatflowSummary;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/chatflows - List the chatflows available to clients.
pub async fn list_chatflows(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<ApiResponse<Vec<ChatflowSummary>>, AppError> {
    let flows = state.chat_service.list_chatflows().await?;
    Ok(ApiResponse::success(flows))
}
