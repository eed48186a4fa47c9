//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Send pathway
        .route("/chat/ai", post(handlers::send::send_message))
        .route("/chat/ai/stream", post(handlers::send::send_message_stream))
        // Chat CRUD
        .route("/chat/create", post(handlers::chat::create_chat))
        .route("/chat/list", get(handlers::chat::list_chats))
        .route(
            "/chat/{id}",
            get(handlers::chat::get_chat).delete(handlers::chat::delete_chat),
        )
        .route("/chat/{id}/rename", put(handlers::chat::rename_chat))
        .route("/chat/{id}/chatflow", put(handlers::chat::update_chatflow))
        // Chatflow listing
        .route("/chatflows", get(handlers::chatflow::list_chatflows));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
