//! Retention settings endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, warn};

use super::ApiError;
use crate::api::websocket::state::AppState;
use crate::auth::Capability;
use crate::types::RetentionSettings;

/// GET /api/settings - current retention configuration
pub async fn get(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let settings = state.retention.get();
    Json(settings.as_ref().clone())
}

/// PUT /api/settings - replace the retention configuration
pub async fn put(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<RetentionSettings>,
) -> impl IntoResponse {
    if !state.gatekeeper.allows(Capability::ManageSettings) {
        let error = ApiError::forbidden("settings management not permitted");
        return (StatusCode::FORBIDDEN, Json(error)).into_response();
    }

    match state.retention.save(settings) {
        Ok(saved) => {
            info!("retention settings replaced");
            Json(saved.as_ref().clone()).into_response()
        }
        Err(err) => {
            warn!(%err, "failed to save settings");
            let error = ApiError::internal("failed to save settings");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}
