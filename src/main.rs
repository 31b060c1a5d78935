//! Webhook Viewer - Binary Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use webhook_viewer::api::{create_router, AppState};
use webhook_viewer::auth::AllowAll;
use webhook_viewer::config::ServerConfig;
use webhook_viewer::store::{KvEngine, MessageStore, RetentionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    let engine = Arc::new(KvEngine::new());
    let retention = Arc::new(RetentionStore::new(engine.clone()));
    let store = Arc::new(MessageStore::new(engine, retention.clone()));
    let state = Arc::new(AppState::new(
        store,
        retention,
        Arc::new(AllowAll),
        config.channel_capacity,
    ));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "webhook viewer listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
