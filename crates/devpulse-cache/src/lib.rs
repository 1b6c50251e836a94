//! Process-wide TTL cache shielding the upstream API from repeated calls.
//!
//! No persistence and no distribution: a plain key -> (value, expiry) map.
//! Expired entries are ignored on read rather than proactively swept; they
//! are overwritten by the next successful `set`. Constructed once per
//! process and passed by dependency injection, never as a global.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A time-bounded key-value store with per-key atomic read/write
///
/// Concurrent callers may race on a borderline-expired entry; a stale read
/// within one TTL window is accepted as immaterial.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the stored value if the entry has not expired
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                debug!(key, "cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Store a value, overwriting any prior entry under the same key
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Explicitly invalidate one key; returns whether an entry was present
    pub fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.remove(key).is_some()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
