//! Replay protection for signed requests.
//!
//! Two independent checks, both required: the declared timestamp must fall
//! within the configured window of server time, and the (merchant, nonce)
//! pair must never have been seen within that window. Nonce consumption is
//! a single atomic insert-if-absent; a read-then-write pair would let two
//! concurrent requests with the same nonce both pass.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;

pub struct ReplayGuard {
    cache: Arc<TtlCache>,
    window_seconds: i64,
}

impl ReplayGuard {
    pub fn new(cache: Arc<TtlCache>, window_seconds: i64) -> Self {
        Self {
            cache,
            window_seconds,
        }
    }

    /// Freshness: `|server_now - ts| <= window`. Rejects replays of old
    /// captured requests even when their signature is still valid.
    pub fn is_fresh(&self, timestamp: i64) -> bool {
        (Utc::now().timestamp() - timestamp).abs() <= self.window_seconds
    }

    /// Consume a nonce for a merchant. Returns `true` the first time,
    /// `false` when the nonce was already used within the window. Nonces
    /// are scoped per merchant: the same value from another merchant is
    /// not a collision.
    pub fn consume_nonce(&self, merchant_id: i64, nonce: &str) -> bool {
        let key = format!("nonce:{}:{}", merchant_id, nonce);
        let ttl = Duration::from_secs(self.window_seconds.max(0) as u64);
        self.cache.insert_if_absent(&key, ttl)
    }
}
