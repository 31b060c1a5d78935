//! Core data types for the webhook viewer

pub mod filter;
pub mod message;
pub mod retention;

pub use filter::{BatchDeleteRequest, MessageFilter, PagedResult};
pub use message::Message;
pub use retention::RetentionSettings;
