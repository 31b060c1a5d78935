//! End-to-end tests for the HTTP API

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use webhook_viewer::api::{create_router, AppState, StoreEvent};
use webhook_viewer::auth::{AllowAll, DenyAll, Gatekeeper};
use webhook_viewer::store::{KvEngine, MessageStore, RetentionStore};

fn setup_with(gatekeeper: Arc<dyn Gatekeeper>) -> (Arc<AppState>, Router) {
    let engine = Arc::new(KvEngine::new());
    let retention = Arc::new(RetentionStore::new(engine.clone()));
    let store = Arc::new(MessageStore::new(engine, retention.clone()));
    let state = Arc::new(AppState::new(store, retention, gatekeeper, 1024));
    let app = create_router(state.clone());
    (state, app)
}

fn setup() -> (Arc<AppState>, Router) {
    setup_with(Arc::new(AllowAll))
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete_with_body(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_ingest_array_then_filter_by_level() {
    let (_, app) = setup();

    let body = r#"[{"message":"m1","Level":"ERR"},{"message":"m2","Level":"INF"}]"#;
    let response = app
        .clone()
        .oneshot(post("/api/webhook/orders/created", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ingest = body_json(response).await;
    assert_eq!(ingest["received"], true);
    assert_eq!(ingest["count"], 2);
    assert_eq!(ingest["ids"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/messages?levels=Error"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(response).await;
    assert_eq!(list["totalCount"], 1);
    let item = &list["items"][0];
    assert_eq!(item["preview"], "m1");
    assert_eq!(item["level"], "Error");
    assert_eq!(item["path"], "/orders/created");
}

#[tokio::test]
async fn test_ingest_empty_array_stores_nothing() {
    let (_, app) = setup();

    let response = app
        .clone()
        .oneshot(post("/api/webhook/empty", "[]"))
        .await
        .unwrap();
    let ingest = body_json(response).await;
    assert_eq!(ingest["count"], 0);
    assert_eq!(ingest["ids"].as_array().unwrap().len(), 0);

    let list = body_json(app.oneshot(get("/api/messages")).await.unwrap()).await;
    assert_eq!(list["totalCount"], 0);
}

#[tokio::test]
async fn test_ingest_without_body_stores_one_message() {
    let (_, app) = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let ingest = body_json(response).await;
    assert_eq!(ingest["count"], 1);

    let list = body_json(app.oneshot(get("/api/messages")).await.unwrap()).await;
    let item = &list["items"][0];
    assert_eq!(item["contentLength"], 0);
    assert!(item.get("rawBody").is_none());
    assert!(item.get("preview").is_none());
}

#[tokio::test]
async fn test_ingest_non_json_body_degrades_to_raw_text() {
    let (_, app) = setup();

    let response = app
        .clone()
        .oneshot(post("/api/webhook/raw", "not json at all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(app.oneshot(get("/api/messages")).await.unwrap()).await;
    let item = &list["items"][0];
    assert_eq!(item["rawBody"], "not json at all");
    assert_eq!(item["preview"], "not json at all");
    assert!(item.get("level").is_none());
}

#[tokio::test]
async fn test_get_single_message_and_not_found() {
    let (_, app) = setup();

    let ingest = body_json(
        app.clone()
            .oneshot(post("/api/webhook/one", r#"{"message":"hello"}"#))
            .await
            .unwrap(),
    )
    .await;
    let id = ingest["ids"][0].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/messages/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let message = body_json(response).await;
    assert_eq!(message["id"], id);
    assert_eq!(message["preview"], "hello");

    let response = app
        .oneshot(get("/api/messages/no-such-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_reporting() {
    let (_, app) = setup();

    for i in 0..120 {
        let body = format!(r#"{{"message":"msg {i}"}}"#);
        app.clone()
            .oneshot(post("/api/webhook/bulk", &body))
            .await
            .unwrap();
    }

    let page1 = body_json(
        app.clone()
            .oneshot(get("/api/messages?page=1&pageSize=50"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(page1["items"].as_array().unwrap().len(), 50);
    assert_eq!(page1["totalCount"], 120);
    assert_eq!(page1["totalPages"], 3);

    let page3 = body_json(
        app.oneshot(get("/api/messages?page=3&pageSize=50"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(page3["items"].as_array().unwrap().len(), 20);
    assert_eq!(page3["page"], 3);
    assert_eq!(page3["pageSize"], 50);
}

#[tokio::test]
async fn test_delete_single_broadcasts_id() {
    let (state, app) = setup();

    let ingest = body_json(
        app.clone()
            .oneshot(post("/api/webhook/x", r#"{"message":"bye"}"#))
            .await
            .unwrap(),
    )
    .await;
    let id = ingest["ids"][0].as_str().unwrap().to_string();

    let mut rx = state.subscribe();
    let response = app
        .clone()
        .oneshot(delete(&format!("/api/messages/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let event = rx.recv().await.unwrap();
    assert!(matches!(
        event.event,
        StoreEvent::MessageDeleted { id: ref deleted } if *deleted == id
    ));

    // Second delete is a miss
    let response = app
        .oneshot(delete(&format!("/api/messages/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_by_filter_removes_only_matching_paths() {
    let (state, app) = setup();

    for i in 0..3 {
        let body = format!(r#"{{"message":"order {i}"}}"#);
        app.clone()
            .oneshot(post("/api/webhook/Orders/created", &body))
            .await
            .unwrap();
    }
    app.clone()
        .oneshot(post("/api/webhook/billing", r#"{"message":"invoice"}"#))
        .await
        .unwrap();

    let mut rx = state.subscribe();
    let response = app
        .clone()
        .oneshot(delete_with_body(
            "/api/messages",
            r#"{"filter":{"pathContains":"orders"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    assert_eq!(result["deleted"], 3);
    let mut deleted_ids: Vec<String> = result["ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    deleted_ids.sort();

    // Broadcast carries exactly the removed set
    let event = rx.recv().await.unwrap();
    match event.event {
        StoreEvent::MessagesDeleted { mut ids } => {
            ids.sort();
            assert_eq!(ids, deleted_ids);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let list = body_json(app.oneshot(get("/api/messages")).await.unwrap()).await;
    assert_eq!(list["totalCount"], 1);
    assert_eq!(list["items"][0]["path"], "/billing");
}

#[tokio::test]
async fn test_delete_batch_reports_removed_subset() {
    let (_, app) = setup();

    let ingest = body_json(
        app.clone()
            .oneshot(post(
                "/api/webhook/batch",
                r#"[{"message":"a"},{"message":"b"}]"#,
            ))
            .await
            .unwrap(),
    )
    .await;
    let ids: Vec<String> = ingest["ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();

    let body = serde_json::json!({ "ids": [ids[0], "missing", ids[1]] }).to_string();
    let result = body_json(
        app.oneshot(delete_with_body("/api/messages", &body))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(result["deleted"], 2);
    let removed: Vec<&str> = result["ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(removed, vec![ids[0].as_str(), ids[1].as_str()]);
}

#[tokio::test]
async fn test_delete_all_then_everything_is_gone() {
    let (state, app) = setup();

    let mut all_ids = Vec::new();
    for i in 0..4 {
        let ingest = body_json(
            app.clone()
                .oneshot(post("/api/webhook/wipe", &format!(r#"{{"message":"{i}"}}"#)))
                .await
                .unwrap(),
        )
        .await;
        all_ids.push(ingest["ids"][0].as_str().unwrap().to_string());
    }

    let mut rx = state.subscribe();
    let result = body_json(
        app.clone()
            .oneshot(delete_with_body("/api/messages", r#"{"all":true}"#))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(result["deleted"], 4);

    let event = rx.recv().await.unwrap();
    assert!(matches!(event.event, StoreEvent::AllMessagesDeleted));

    for id in &all_ids {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/messages/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_batch_delete_requires_exactly_one_mode() {
    let (_, app) = setup();

    // No mode at all
    let response = app
        .clone()
        .oneshot(delete_with_body("/api/messages", r#"{}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Empty ids list does not count as a mode
    let response = app
        .clone()
        .oneshot(delete_with_body("/api/messages", r#"{"ids":[]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Two modes at once
    let response = app
        .oneshot(delete_with_body(
            "/api/messages",
            r#"{"all":true,"ids":["x"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deletes_are_capability_gated() {
    let (_, app) = setup_with(Arc::new(DenyAll));

    let ingest = body_json(
        app.clone()
            .oneshot(post("/api/webhook/guarded", r#"{"message":"keep"}"#))
            .await
            .unwrap(),
    )
    .await;
    let id = ingest["ids"][0].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/messages/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(delete_with_body("/api/messages", r#"{"all":true}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Nothing was deleted
    let response = app
        .oneshot(get(&format!("/api/messages/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let (_, app) = setup();

    let current = body_json(app.clone().oneshot(get("/api/settings")).await.unwrap()).await;
    assert_eq!(current["warningMinutes"], 10080);

    let updated = r#"{"verboseMinutes":5,"debugMinutes":10,"informationMinutes":15,
                      "warningMinutes":20,"errorMinutes":25,"fatalMinutes":30}"#;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/settings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(updated))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let saved = body_json(app.oneshot(get("/api/settings")).await.unwrap()).await;
    assert_eq!(saved["warningMinutes"], 20);
    assert_eq!(saved["fatalMinutes"], 30);
}

#[tokio::test]
async fn test_search_pattern_filters_listing() {
    let (_, app) = setup();

    app.clone()
        .oneshot(post("/api/webhook/s", r#"{"message":"timeout talking to db"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(post("/api/webhook/s", r#"{"message":"status [good] here"}"#))
        .await
        .unwrap();

    let list = body_json(
        app.clone()
            .oneshot(get("/api/messages?searchPattern=timeout.*db"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(list["totalCount"], 1);

    // "[good" is not a valid regex; degrades to substring matching
    let list = body_json(
        app.oneshot(get("/api/messages?searchPattern=%5Bgood"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(list["totalCount"], 1);
}

#[tokio::test]
async fn test_new_message_broadcast_carries_payload() {
    let (state, app) = setup();
    let mut rx = state.subscribe();

    app.oneshot(post("/api/webhook/feed", r#"{"message":"live","level":"wrn"}"#))
        .await
        .unwrap();

    let event = rx.recv().await.unwrap();
    match event.event {
        StoreEvent::NewMessage { payload } => {
            assert_eq!(payload.preview.as_deref(), Some("live"));
            assert_eq!(payload.level.as_deref(), Some("Warning"));
            assert_eq!(payload.path, "/feed");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
