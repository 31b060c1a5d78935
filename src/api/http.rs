//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{ingest, messages, settings};
use super::websocket::{handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket change feed
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Catch-all ingestion
        .route("/api/webhook", post(ingest::receive_root))
        .route("/api/webhook/", post(ingest::receive_root))
        .route("/api/webhook/*path", post(ingest::receive))
        // Message queries and deletion
        .route(
            "/api/messages",
            get(messages::list).delete(messages::batch_delete),
        )
        .route(
            "/api/messages/:id",
            get(messages::get_one).delete(messages::delete_one),
        )
        // Retention settings
        .route("/api/settings", get(settings::get).put(settings::put))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
