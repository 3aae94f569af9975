//! Ephemeral TTL key-value store.
//!
//! Backs replay-nonce tracking and rate-limit counters. Both callers need
//! their check-and-set to be a single atomic operation; DashMap's entry API
//! holds the shard lock for the duration of each call, so two concurrent
//! requests for the same key cannot both pass.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::{Duration, Instant};

struct CacheEntry {
    expires_at: Instant,
    count: i64,
}

/// Thread-safe in-process store with atomic insert-if-absent and
/// increment-with-expiry primitives. Expired entries are overwritten on
/// access; `purge_expired` reclaims the rest.
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert a presence marker unless a live one exists.
    ///
    /// Returns `true` if the marker was inserted (key was absent or expired),
    /// `false` if a live marker is already present.
    pub fn insert_if_absent(&self, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().expires_at > now {
                    return false;
                }
                occupied.insert(CacheEntry {
                    expires_at: now + ttl,
                    count: 1,
                });
                true
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry {
                    expires_at: now + ttl,
                    count: 1,
                });
                true
            }
        }
    }

    /// Increment the counter for `key`, arming the expiry on the first
    /// increment of a window. Returns the post-increment count.
    pub fn increment(&self, key: &str, ttl: Duration) -> i64 {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.expires_at <= now {
                    // Window elapsed: start a fresh one.
                    entry.expires_at = now + ttl;
                    entry.count = 1;
                } else {
                    entry.count += 1;
                }
                entry.count
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry {
                    expires_at: now + ttl,
                    count: 1,
                });
                1
            }
        }
    }

    /// Whether a live entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|e| e.expires_at > Instant::now())
            .unwrap_or(false)
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, e| e.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}
