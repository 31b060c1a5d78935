//! Message query and deletion endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use super::ApiError;
use crate::api::websocket::{state::AppState, StoreEvent};
use crate::auth::Capability;
use crate::types::{BatchDeleteRequest, Message, MessageFilter, PagedResult};

/// Listing response; the paged result plus the derived page count
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListResponse {
    #[serde(flatten)]
    pub result: PagedResult<Message>,
    pub total_pages: usize,
}

/// Outcome of a bulk delete
#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
}

/// GET /api/messages - filtered, paginated listing
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MessageFilter>,
) -> impl IntoResponse {
    match state.store.query(&filter) {
        Ok(result) => {
            let total_pages = result.total_pages();
            Json(MessageListResponse {
                result,
                total_pages,
            })
            .into_response()
        }
        Err(err) => {
            warn!(%err, "message query failed");
            let error = ApiError::internal("query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}

/// GET /api/messages/:id - single message
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&id) {
        Ok(Some(message)) => (StatusCode::OK, Json(message)).into_response(),
        Ok(None) => {
            let error = ApiError::not_found(format!("Message '{}' not found", id));
            (StatusCode::NOT_FOUND, Json(error)).into_response()
        }
        Err(err) => {
            warn!(%id, %err, "message lookup failed");
            let error = ApiError::internal("lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}

/// DELETE /api/messages/:id - delete a single message
pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !state.gatekeeper.allows(Capability::DeleteSingle) {
        let error = ApiError::forbidden("delete not permitted");
        return (StatusCode::FORBIDDEN, Json(error)).into_response();
    }

    if !state.store.delete_one(&id) {
        let error = ApiError::not_found(format!("Message '{}' not found", id));
        return (StatusCode::NOT_FOUND, Json(error)).into_response();
    }

    info!(%id, "message deleted");
    state.broadcast(StoreEvent::MessageDeleted { id });
    StatusCode::NO_CONTENT.into_response()
}

/// DELETE /api/messages - batch, filtered, or full deletion.
/// Exactly one of `ids`, `filter`, `all` must be supplied.
pub async fn batch_delete(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchDeleteRequest>,
) -> impl IntoResponse {
    if !state.gatekeeper.allows(Capability::DeleteBulk) {
        let error = ApiError::forbidden("bulk delete not permitted");
        return (StatusCode::FORBIDDEN, Json(error)).into_response();
    }

    let has_ids = request.ids.as_ref().is_some_and(|ids| !ids.is_empty());
    let modes = [request.all, request.filter.is_some(), has_ids];
    if modes.iter().filter(|&&m| m).count() != 1 {
        let error = ApiError::bad_request("Provide exactly one of ids, filter, or all=true");
        return (StatusCode::BAD_REQUEST, Json(error)).into_response();
    }

    if request.all {
        let count = state.store.delete_all();
        info!(count, "all messages deleted");
        state.broadcast(StoreEvent::AllMessagesDeleted);
        return Json(BatchDeleteResponse {
            deleted: count,
            ids: None,
        })
        .into_response();
    }

    let result = if let Some(filter) = &request.filter {
        state.store.delete_by_filter(filter)
    } else {
        Ok(state.store.delete_batch(request.ids.as_deref().unwrap_or(&[])))
    };

    match result {
        Ok(ids) => {
            info!(count = ids.len(), "messages deleted");
            state.broadcast(StoreEvent::MessagesDeleted { ids: ids.clone() });
            Json(BatchDeleteResponse {
                deleted: ids.len(),
                ids: Some(ids),
            })
            .into_response()
        }
        Err(err) => {
            warn!(%err, "bulk delete failed");
            let error = ApiError::internal("delete failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}
