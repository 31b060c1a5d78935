//! Shared application state

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use super::events::{StoreEvent, WsMessage};
use crate::auth::{AllowAll, Gatekeeper};
use crate::store::{KvEngine, MessageStore, RetentionStore};

/// Shared state for HTTP handlers and WebSocket connections
pub struct AppState {
    /// The message store
    pub store: Arc<MessageStore>,

    /// Retention policy provider
    pub retention: Arc<RetentionStore>,

    /// Capability check for destructive operations
    pub gatekeeper: Arc<dyn Gatekeeper>,

    /// Broadcast channel for sending events to all connected clients
    pub event_tx: broadcast::Sender<WsMessage>,

    /// Monotonically increasing sequence counter
    pub sequence_counter: Arc<AtomicU64>,
}

impl AppState {
    /// Create state with the given channel capacity. If clients fall
    /// behind by more than `capacity` events they lag out and must
    /// re-query.
    pub fn new(
        store: Arc<MessageStore>,
        retention: Arc<RetentionStore>,
        gatekeeper: Arc<dyn Gatekeeper>,
        capacity: usize,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);

        Self {
            store,
            retention,
            gatekeeper,
            event_tx,
            sequence_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fresh state over a new in-memory engine with a permissive
    /// gatekeeper.
    pub fn with_defaults() -> Self {
        let engine = Arc::new(KvEngine::new());
        let retention = Arc::new(RetentionStore::new(engine.clone()));
        let store = Arc::new(MessageStore::new(engine, retention.clone()));
        Self::new(store, retention, Arc::new(AllowAll), 1024)
    }

    /// Broadcast a store event to all connected WebSocket clients
    pub fn broadcast(&self, event: StoreEvent) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            event,
            sequence_id: seq,
            timestamp: chrono::Utc::now().timestamp(),
        };

        // Ignore send errors - they just mean no receivers are listening
        let _ = self.event_tx.send(msg);
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.event_tx.subscribe()
    }
}
