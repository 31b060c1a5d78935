//! In-process key-value engine with per-entry TTL and sorted indexes
//!
//! Provides the small slice of a Redis-style engine the message store
//! needs: string values with optional expiry, plus named sorted sets of
//! `(score, member)` pairs for range scans. Expiry is enforced lazily at
//! read time; an expired entry is indistinguishable from a missing one.
//!
//! Individual operations are atomic (each takes one lock), but the engine
//! offers no multi-key transactions. Callers that pair a value write with
//! an index write must tolerate observing one without the other.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Default)]
struct SortedSet {
    /// Ordered by (score, member); member ties break by lexical order
    by_score: BTreeMap<(i64, String), ()>,
    /// Member -> current score, for removal without scanning
    scores: HashMap<String, i64>,
}

/// The key-value engine backing the message store.
pub struct KvEngine {
    values: RwLock<HashMap<String, Entry>>,
    sorted: RwLock<HashMap<String, SortedSet>>,
}

impl KvEngine {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            sorted: RwLock::new(HashMap::new()),
        }
    }

    /// Store a string value, replacing any previous entry under `key`.
    /// `ttl` of `None` means the value never expires.
    pub fn set(&self, key: &str, value: String, ttl: Option<Duration>) {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.values.write().insert(key.to_string(), entry);
    }

    /// Fetch a live value. Expired entries read as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let values = self.values.read();
        let entry = values.get(key)?;
        if entry.is_expired(now) {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Remove a value. Returns true only if a live entry was removed;
    /// deleting an already-expired entry reads as a miss.
    pub fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        match self.values.write().remove(key) {
            Some(entry) => !entry.is_expired(now),
            None => false,
        }
    }

    /// Remaining time to live for a key, `None` if the key is missing,
    /// expired, or has no expiry.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let values = self.values.read();
        let entry = values.get(key)?;
        if entry.is_expired(now) {
            return None;
        }
        entry.expires_at.map(|at| at - now)
    }

    /// All live keys starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = Instant::now();
        self.values
            .read()
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Add a member to a sorted set, replacing its previous score if any.
    pub fn zadd(&self, set: &str, score: i64, member: &str) {
        let mut sorted = self.sorted.write();
        let set = sorted.entry(set.to_string()).or_default();
        if let Some(old_score) = set.scores.insert(member.to_string(), score) {
            set.by_score.remove(&(old_score, member.to_string()));
        }
        set.by_score.insert((score, member.to_string()), ());
    }

    /// Members whose score lies in `[min, max]`, highest score first.
    /// An inverted range is empty, not an error.
    pub fn zrange_desc(&self, set: &str, min: i64, max: i64) -> Vec<String> {
        if min > max {
            return Vec::new();
        }
        let sorted = self.sorted.read();
        let Some(set) = sorted.get(set) else {
            return Vec::new();
        };
        set.by_score
            .range((min, String::new())..=(max, MEMBER_CEILING.to_string()))
            .rev()
            .map(|((_, member), _)| member.clone())
            .collect()
    }

    /// Remove a member from a sorted set. Returns whether it was present.
    pub fn zrem(&self, set: &str, member: &str) -> bool {
        let mut sorted = self.sorted.write();
        let Some(set) = sorted.get_mut(set) else {
            return false;
        };
        match set.scores.remove(member) {
            Some(score) => {
                set.by_score.remove(&(score, member.to_string()));
                true
            }
            None => false,
        }
    }

    /// Drop an entire sorted set.
    pub fn zclear(&self, set: &str) {
        self.sorted.write().remove(set);
    }

    /// Number of members in a sorted set.
    pub fn zcard(&self, set: &str) -> usize {
        self.sorted
            .read()
            .get(set)
            .map_or(0, |set| set.scores.len())
    }
}

impl Default for KvEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound for member strings in range queries. Members are uuid
/// strings (ASCII), so any of them sorts below this.
const MEMBER_CEILING: char = '\u{10FFFF}';
