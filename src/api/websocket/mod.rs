//! WebSocket change feed
//!
//! Broadcasts store mutations (new message, deletions) to all connected
//! clients. Best-effort fanout with no backlog: late subscribers
//! reconcile by re-querying the REST API.

pub mod events;
pub mod handler;
pub mod state;

pub use events::{StoreEvent, WsMessage};
pub use state::AppState;
