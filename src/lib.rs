//! Webhook Viewer
//!
//! A webhook capture server: accepts arbitrary HTTP payloads on a
//! catch-all route, classifies and indexes them, retains each message for
//! a duration chosen by its severity, and serves filtered, paginated
//! queries plus a real-time WebSocket change feed.
//!
//! # Features
//!
//! - **Catch-all ingestion**: any body on any sub-path; never rejects a
//!   payload
//! - **JSON-aware classification**: array splitting, preview extraction,
//!   severity normalization across common logging conventions
//! - **Severity-based retention**: per-level TTL in minutes, 0 = forever
//! - **Filtered queries**: time range, level set, path substring, and
//!   regex search with substring fallback, newest-first with pagination
//! - **Change feed**: WebSocket fanout of inserts and deletions
//!
//! # Modules
//!
//! - `types`: Core data structures (Message, MessageFilter, settings)
//! - `classifier`: Request body to message records
//! - `store`: Key-value engine, message store, retention policy
//! - `auth`: Capability-check seam for destructive operations
//! - `api`: Axum router, REST handlers, WebSocket feed
//! - `config`: Environment-driven server configuration

pub mod api;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState, StoreEvent};
pub use store::{KvEngine, MessageStore, RetentionStore, StoreError};
pub use types::{BatchDeleteRequest, Message, MessageFilter, PagedResult, RetentionSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
