//! Retention policy provider
//!
//! Maps a severity label to the TTL applied at insert time. The active
//! configuration lives in the engine under a well-known key and is cached
//! in-process as an immutable snapshot behind an `Arc`; writers swap the
//! whole `Arc`, so readers always see one coherent configuration and never
//! a mix of two.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::engine::KvEngine;
use super::StoreResult;
use crate::types::RetentionSettings;

/// Engine key holding the serialized settings
const SETTINGS_KEY: &str = "webhook:settings";

/// Holds the retention configuration and answers TTL lookups.
pub struct RetentionStore {
    engine: Arc<KvEngine>,
    cached: RwLock<Arc<RetentionSettings>>,
}

impl RetentionStore {
    /// Create a store over the given engine, loading any persisted
    /// configuration and falling back to defaults.
    pub fn new(engine: Arc<KvEngine>) -> Self {
        let store = Self {
            engine,
            cached: RwLock::new(Arc::new(RetentionSettings::default())),
        };
        store.reload();
        store
    }

    /// Refresh the snapshot from the engine so concurrent writers become
    /// visible. A missing or unreadable engine entry keeps the current
    /// snapshot.
    fn reload(&self) {
        if let Some(json) = self.engine.get(SETTINGS_KEY) {
            if let Ok(settings) = serde_json::from_str::<RetentionSettings>(&json) {
                *self.cached.write() = Arc::new(settings);
            }
        }
    }

    /// Current settings, freshly reloaded from the engine.
    pub fn get(&self) -> Arc<RetentionSettings> {
        self.reload();
        self.cached.read().clone()
    }

    /// Replace the whole configuration: persist to the engine, then swap
    /// the in-memory snapshot.
    pub fn save(&self, settings: RetentionSettings) -> StoreResult<Arc<RetentionSettings>> {
        let json = serde_json::to_string(&settings)?;
        self.engine.set(SETTINGS_KEY, json, None);

        let snapshot = Arc::new(settings);
        *self.cached.write() = snapshot.clone();
        Ok(snapshot)
    }

    /// TTL for a message with the given level.
    ///
    /// Unknown or missing levels share the zero-minutes convention with
    /// explicitly infinite retention: both yield `None`, never expires.
    pub fn ttl_for_level(&self, level: Option<&str>) -> Option<Duration> {
        let settings = self.cached.read().clone();

        let minutes = match level.map(|l| l.to_lowercase()).as_deref() {
            Some("verbose") => settings.verbose_minutes,
            Some("debug") => settings.debug_minutes,
            Some("information") => settings.information_minutes,
            Some("warning") => settings.warning_minutes,
            Some("error") => settings.error_minutes,
            Some("fatal") => settings.fatal_minutes,
            _ => 0,
        };

        if minutes > 0 {
            Some(Duration::from_secs(minutes * 60))
        } else {
            None
        }
    }
}
