//! Fixed-window request rate limiting.
//!
//! Counters live in the ephemeral TTL store under `rl:<key>`. The first
//! increment in a window arms a 60 second expiry, so windows are anchored to
//! first use rather than the calendar. A burst straddling a window boundary
//! can therefore exceed the nominal per-minute rate; that approximation is
//! accepted.

use crate::cache::TtlCache;
use std::sync::Arc;
use std::time::Duration;

pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Fixed-window counter keyed by an arbitrary string, e.g.
/// `user:<id>:transfers` or `login:<email>`.
pub struct RateLimiter {
    cache: Arc<TtlCache>,
    limit_per_window: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(cache: Arc<TtlCache>, limit_per_window: u32) -> Self {
        Self {
            cache,
            limit_per_window,
            window: RATE_WINDOW,
        }
    }

    /// Override the window length. Test hook.
    #[cfg(test)]
    pub fn with_window(cache: Arc<TtlCache>, limit_per_window: u32, window: Duration) -> Self {
        Self {
            cache,
            limit_per_window,
            window,
        }
    }

    /// Count one request against `key`. Returns `true` if the request is
    /// within the window's ceiling, `false` if the limit is exceeded.
    pub fn allow(&self, key: &str) -> bool {
        let bucket = format!("rl:{}", key);
        let count = self.cache.increment(&bucket, self.window);
        let allowed = count <= i64::from(self.limit_per_window);
        if !allowed {
            tracing::warn!(key = %key, count, "Rate limit exceeded");
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn limiter(limit: u32) -> RateLimiter {
        RateLimiter::new(Arc::new(TtlCache::new()), limit)
    }

    #[test]
    fn test_allows_up_to_limit() {
        let rl = limiter(5);
        for _ in 0..5 {
            assert!(rl.allow("user:1:transfers"));
        }
        assert!(!rl.allow("user:1:transfers"));
    }

    #[test]
    fn test_limit_is_per_key() {
        let rl = limiter(1);
        assert!(rl.allow("login:a@example.com"));
        assert!(!rl.allow("login:a@example.com"));
        assert!(rl.allow("login:b@example.com"));
    }

    #[test]
    fn test_count_resets_after_window() {
        let rl = RateLimiter::with_window(Arc::new(TtlCache::new()), 2, Duration::from_millis(30));
        assert!(rl.allow("k"));
        assert!(rl.allow("k"));
        assert!(!rl.allow("k"));
        thread::sleep(Duration::from_millis(60));
        assert!(rl.allow("k"));
    }

    #[test]
    fn test_sixty_first_login_attempt_rejected() {
        let rl = limiter(60);
        for _ in 0..60 {
            assert!(rl.allow("login:same@example.com"));
        }
        assert!(!rl.allow("login:same@example.com"));
    }
}
