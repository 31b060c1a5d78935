//! Catch-all webhook ingestion endpoint
//!
//! Accepts any payload on any sub-path. Ingestion never rejects a body:
//! unparseable payloads are stored as raw text by the classifier.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use super::ApiError;
use crate::api::websocket::{state::AppState, StoreEvent};
use crate::classifier;

/// Response for an ingestion request
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub received: bool,
    pub count: usize,
    pub ids: Vec<String>,
}

/// POST /api/webhook - ingestion without a sub-path
pub async fn receive_root(
    state: State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    receive_inner(state, String::new(), connect_info, headers, body).await
}

/// POST /api/webhook/*path - catch-all ingestion
pub async fn receive(
    state: State<Arc<AppState>>,
    Path(path): Path<String>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    receive_inner(state, path, connect_info, headers, body).await
}

async fn receive_inner(
    State(state): State<Arc<AppState>>,
    path: String,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let webhook_path = format!("/{}", path.trim_start_matches('/'));
    let source_ip = connect_info.map(|ConnectInfo(addr)| addr.ip().to_string());
    let header_map = collect_headers(&headers);

    let text;
    let body = if body.is_empty() {
        None
    } else {
        text = String::from_utf8_lossy(&body).into_owned();
        Some(text.as_str())
    };

    let messages = classifier::classify(body, &webhook_path, source_ip.as_deref(), &header_map);

    let mut ids = Vec::with_capacity(messages.len());
    for message in messages {
        if let Err(err) = state.store.insert(&message) {
            error!(path = %webhook_path, %err, "failed to store message");
            let error = ApiError::internal("failed to store message");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response();
        }
        ids.push(message.id.clone());
        state.broadcast(StoreEvent::NewMessage { payload: message });
    }

    debug!(path = %webhook_path, count = ids.len(), "ingested webhook payload");

    Json(IngestResponse {
        received: true,
        count: ids.len(),
        ids,
    })
    .into_response()
}

/// Capture the request headers, preserving repeated names as value lists.
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}
