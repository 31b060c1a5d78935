//! Stored webhook message

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single captured webhook message.
///
/// One inbound request can produce several of these (a JSON array body is
/// split into one message per element). Once stored a message is never
/// mutated; deletion and TTL expiry are the only ways it goes away.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique id, assigned at creation and never reused
    pub id: String,
    /// Creation instant; messages are sorted newest-first by this
    pub timestamp: DateTime<Utc>,
    /// Ingestion sub-path the sender posted to (always starts with `/`)
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    /// Request headers; one name may carry several values
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    /// Exact payload fragment this message represents, absent for empty bodies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<String>,
    /// Byte length of `raw_body`, 0 if absent
    pub content_length: u64,
    /// Human-scannable summary, capped at 200 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Normalized severity label, or the raw label if unrecognized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Message {
    /// Create an empty message carrying only the request context.
    ///
    /// The classifier fills in body-derived fields afterwards.
    pub fn new(
        path: String,
        source_ip: Option<String>,
        headers: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            path,
            source_ip,
            headers,
            raw_body: None,
            content_length: 0,
            preview: None,
            level: None,
        }
    }
}
