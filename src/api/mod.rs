//! HTTP and WebSocket API

pub mod http;
pub mod rest;
pub mod websocket;

pub use http::create_router;
pub use websocket::{AppState, StoreEvent};
