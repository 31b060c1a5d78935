//! Event classifier: raw request bodies to normalized messages
//!
//! Turns one inbound payload into zero or more [`Message`] records. A JSON
//! array is split into one message per element; any other JSON value, or a
//! body that is not JSON at all, yields exactly one message. Classification
//! never fails — a payload that cannot be parsed degrades to raw-text
//! storage rather than being rejected.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::Message;

/// Maximum preview length before truncation
pub const PREVIEW_MAX_LEN: usize = 200;

/// Candidate fields for preview text, checked in order. Covers plain
/// `message` fields, Serilog rendered/template fields, and CLEF shorthand.
const PREVIEW_FIELDS: [&str; 6] = [
    "message",
    "RenderedMessage",
    "@m",
    "msg",
    "MessageTemplate",
    "@mt",
];

/// Candidate fields for the severity label, checked in order
const LEVEL_FIELDS: [&str; 5] = ["Level", "level", "@l", "severity", "Severity"];

/// Classify one request body into stored messages.
///
/// `body` is `None` when the request carried no payload; that still yields
/// one (empty) message. A JSON array with zero elements yields zero.
pub fn classify(
    body: Option<&str>,
    path: &str,
    source_ip: Option<&str>,
    headers: &BTreeMap<String, Vec<String>>,
) -> Vec<Message> {
    let base = || {
        Message::new(
            path.to_string(),
            source_ip.map(|ip| ip.to_string()),
            headers.clone(),
        )
    };

    let Some(body) = body else {
        return vec![base()];
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(elements)) => elements
            .iter()
            .map(|element| {
                // The element's own re-serialization becomes the stored body
                let text = element.to_string();
                let mut msg = base();
                msg.content_length = text.len() as u64;
                msg.preview = Some(extract_preview(element, &text));
                msg.level = extract_level(element);
                msg.raw_body = Some(text);
                msg
            })
            .collect(),
        Ok(value) => {
            let mut msg = base();
            msg.raw_body = Some(body.to_string());
            msg.content_length = body.len() as u64;
            msg.preview = Some(extract_preview(&value, body));
            msg.level = extract_level(&value);
            vec![msg]
        }
        Err(_) => {
            // Not valid JSON — store raw body as-is
            let mut msg = base();
            msg.raw_body = Some(body.to_string());
            msg.content_length = body.len() as u64;
            msg.preview = Some(truncate(body));
            vec![msg]
        }
    }
}

/// Pick the preview for one JSON value.
///
/// Objects are scanned for the first non-blank string among the known
/// message fields; everything else falls back to the value's raw text.
fn extract_preview(value: &Value, raw: &str) -> String {
    if let Value::Object(map) = value {
        for field in PREVIEW_FIELDS {
            if let Some(Value::String(text)) = map.get(field) {
                if !text.trim().is_empty() {
                    return truncate(text);
                }
            }
        }
    }

    truncate(raw)
}

/// Extract and normalize the severity label from a JSON object.
///
/// The first string-valued level field wins. Labels outside the
/// normalization table are kept verbatim.
fn extract_level(value: &Value) -> Option<String> {
    let Value::Object(map) = value else {
        return None;
    };

    for field in LEVEL_FIELDS {
        if let Some(Value::String(raw)) = map.get(field) {
            return Some(normalize_level(raw));
        }
    }

    None
}

/// Case-insensitive mapping of common level spellings onto the six
/// canonical labels. Unrecognized labels pass through unchanged.
pub fn normalize_level(raw: &str) -> String {
    match raw.to_ascii_lowercase().as_str() {
        "verbose" | "trace" | "vrb" => "Verbose".to_string(),
        "debug" | "dbg" => "Debug".to_string(),
        "information" | "info" | "inf" => "Information".to_string(),
        "warning" | "warn" | "wrn" => "Warning".to_string(),
        "error" | "err" => "Error".to_string(),
        "fatal" | "critical" | "ftl" => "Fatal".to_string(),
        _ => raw.to_string(),
    }
}

fn truncate(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_MAX_LEN) {
        Some((byte_pos, _)) => format!("{}...", &text[..byte_pos]),
        None => text.to_string(),
    }
}
