//! Message persistence: key-value engine, message store, retention policy

pub mod engine;
pub mod messages;
pub mod retention;

use thiserror::Error;

pub use engine::KvEngine;
pub use messages::MessageStore;
pub use retention::RetentionStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the store layer.
///
/// Absent keys are not errors; operations report those through `Option` or
/// `bool` returns instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
