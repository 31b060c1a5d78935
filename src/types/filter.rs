//! Query filter and pagination types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter parameters for listing or bulk-deleting messages.
///
/// Arrives either as query-string parameters on `GET /api/messages` or as
/// the `filter` member of a batch delete body. All predicates are optional;
/// an empty filter matches everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilter {
    /// Case-insensitive substring match on the ingestion path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_contains: Option<String>,
    /// Regular expression matched against rawBody and preview; an
    /// uncompilable pattern degrades to a plain substring match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_pattern: Option<String>,
    /// Comma-separated severity labels, e.g. "Warning,Error,Fatal"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<String>,
    /// Inclusive lower bound on timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    50
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            path_contains: None,
            search_pattern: None,
            levels: None,
            from: None,
            to: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// One page of filtered results plus the total match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> PagedResult<T> {
    /// Empty result for the given page coordinates
    pub fn empty(page: usize, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
            page_size,
        }
    }

    /// Number of pages the full match set spans
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }
}

/// Body of `DELETE /api/messages`; exactly one mode must be supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<MessageFilter>,
    #[serde(default)]
    pub all: bool,
}
