//! REST API module for HTTP endpoints
//!
//! - `POST /api/webhook/*path` - catch-all ingestion
//! - `GET /api/messages` - filtered, paginated listing
//! - `GET /api/messages/:id` - single message
//! - `DELETE /api/messages/:id` - delete one (capability gated)
//! - `DELETE /api/messages` - batch/filtered/all delete (capability gated)
//! - `GET/PUT /api/settings` - retention configuration

pub mod ingest;
pub mod messages;
pub mod settings;

use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "FORBIDDEN".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}
