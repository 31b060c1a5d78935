//! Per-severity retention configuration

use serde::{Deserialize, Serialize};

/// Retention window in minutes for each severity label.
///
/// A value of 0 means the message never expires. Unknown levels fall into
/// the same "never expires" bucket (see `RetentionStore::ttl_for_level`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSettings {
    #[serde(default)]
    pub verbose_minutes: u64,
    #[serde(default)]
    pub debug_minutes: u64,
    #[serde(default)]
    pub information_minutes: u64,
    #[serde(default)]
    pub warning_minutes: u64,
    #[serde(default)]
    pub error_minutes: u64,
    #[serde(default)]
    pub fatal_minutes: u64,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            verbose_minutes: 60,          // 1 hour
            debug_minutes: 360,           // 6 hours
            information_minutes: 1440,    // 24 hours
            warning_minutes: 10080,       // 7 days
            error_minutes: 43200,         // 30 days
            fatal_minutes: 0,             // forever
        }
    }
}
