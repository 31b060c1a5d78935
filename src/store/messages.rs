//! Message store: time-indexed, TTL-bounded message persistence
//!
//! Messages live in the engine as JSON values under `webhook:msg:<id>` with
//! a per-message TTL chosen by the retention policy, plus an entry in the
//! `webhook:messages` sorted index keyed by timestamp millis. The two
//! writes are not transactional; scans tolerate index entries whose value
//! has expired or never landed by silently dropping them.

use std::sync::Arc;

use regex::RegexBuilder;

use super::engine::KvEngine;
use super::retention::RetentionStore;
use super::StoreResult;
use crate::types::{Message, MessageFilter, PagedResult};

/// Sorted index of (timestamp millis, id)
const INDEX_KEY: &str = "webhook:messages";
/// Prefix for per-message value keys
const MESSAGE_KEY_PREFIX: &str = "webhook:msg:";

/// Cap on compiled search patterns. The regex crate matches in linear
/// time, so bounding the compiled size bounds the per-message cost.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

pub struct MessageStore {
    engine: Arc<KvEngine>,
    retention: Arc<RetentionStore>,
}

impl MessageStore {
    pub fn new(engine: Arc<KvEngine>, retention: Arc<RetentionStore>) -> Self {
        Self { engine, retention }
    }

    fn message_key(id: &str) -> String {
        format!("{MESSAGE_KEY_PREFIX}{id}")
    }

    /// Persist one message: value write with TTL, then index write.
    pub fn insert(&self, message: &Message) -> StoreResult<()> {
        let json = serde_json::to_string(message)?;
        let ttl = self.retention.ttl_for_level(message.level.as_deref());

        self.engine.set(&Self::message_key(&message.id), json, ttl);
        self.engine.zadd(
            INDEX_KEY,
            message.timestamp.timestamp_millis(),
            &message.id,
        );
        Ok(())
    }

    /// Point lookup. Expired messages read as absent.
    pub fn get(&self, id: &str) -> StoreResult<Option<Message>> {
        match self.engine.get(&Self::message_key(id)) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Range-scan the index newest-first, fetch the referenced values, and
    /// apply the filter predicates before paginating.
    pub fn query(&self, filter: &MessageFilter) -> StoreResult<PagedResult<Message>> {
        let page = filter.page.max(1);
        let page_size = filter.page_size;

        let min = filter.from.map_or(i64::MIN, |t| t.timestamp_millis());
        let max = filter.to.map_or(i64::MAX, |t| t.timestamp_millis());

        let ids = self.engine.zrange_desc(INDEX_KEY, min, max);
        if ids.is_empty() {
            return Ok(PagedResult::empty(page, page_size));
        }

        // Drop ids whose value has expired or is missing; an orphaned index
        // entry is not corruption here.
        let messages: Vec<Message> = ids
            .iter()
            .filter_map(|id| self.engine.get(&Self::message_key(id)))
            .filter_map(|json| serde_json::from_str(&json).ok())
            .collect();

        let matched = apply_filters(messages, filter);
        let total_count = matched.len();

        let items: Vec<Message> = matched
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Ok(PagedResult {
            items,
            total_count,
            page,
            page_size,
        })
    }

    /// Remove one message from both the index and the value map.
    /// Succeeds if either existed.
    pub fn delete_one(&self, id: &str) -> bool {
        let removed_index = self.engine.zrem(INDEX_KEY, id);
        let removed_value = self.engine.delete(&Self::message_key(id));
        removed_index || removed_value
    }

    /// Delete each id independently; returns the ids that actually
    /// existed and were removed. A miss on one id never aborts the rest.
    pub fn delete_batch(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| self.delete_one(id))
            .cloned()
            .collect()
    }

    /// Delete every message matching the filter, ignoring its pagination.
    ///
    /// Materializes the full match set before deleting; fine at this scale,
    /// not meant for unbounded result sets.
    pub fn delete_by_filter(&self, filter: &MessageFilter) -> StoreResult<Vec<String>> {
        let unpaginated = MessageFilter {
            page: 1,
            page_size: usize::MAX,
            ..filter.clone()
        };

        let result = self.query(&unpaginated)?;
        let ids: Vec<String> = result.items.into_iter().map(|m| m.id).collect();
        Ok(self.delete_batch(&ids))
    }

    /// Delete every stored message, entry by entry, then clear the index.
    /// Returns the number of values removed. Not atomic: a failure partway
    /// leaves whatever the completed steps produced.
    pub fn delete_all(&self) -> usize {
        let keys = self.engine.keys_with_prefix(MESSAGE_KEY_PREFIX);
        let mut count = 0;
        for key in keys {
            if self.engine.delete(&key) {
                count += 1;
            }
        }
        self.engine.zclear(INDEX_KEY);
        count
    }
}

/// Apply level, path, and search predicates in order.
fn apply_filters(messages: Vec<Message>, filter: &MessageFilter) -> Vec<Message> {
    let mut result = messages;

    if let Some(levels) = filter.levels.as_deref() {
        let wanted: Vec<&str> = levels
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if !wanted.is_empty() {
            result.retain(|m| {
                m.level
                    .as_deref()
                    .is_some_and(|level| wanted.iter().any(|w| w.eq_ignore_ascii_case(level)))
            });
        }
    }

    if let Some(path_contains) = filter.path_contains.as_deref() {
        if !path_contains.is_empty() {
            let needle = path_contains.to_lowercase();
            result.retain(|m| m.path.to_lowercase().contains(&needle));
        }
    }

    if let Some(pattern) = filter.search_pattern.as_deref() {
        if !pattern.is_empty() {
            match RegexBuilder::new(pattern)
                .case_insensitive(true)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
            {
                Ok(regex) => result.retain(|m| {
                    regex.is_match(m.raw_body.as_deref().unwrap_or(""))
                        || regex.is_match(m.preview.as_deref().unwrap_or(""))
                }),
                Err(_) => {
                    // Uncompilable pattern degrades to substring matching
                    let needle = pattern.to_lowercase();
                    result.retain(|m| {
                        m.raw_body
                            .as_deref()
                            .is_some_and(|body| body.to_lowercase().contains(&needle))
                            || m.preview
                                .as_deref()
                                .is_some_and(|preview| preview.to_lowercase().contains(&needle))
                    });
                }
            }
        }
    }

    result
}
