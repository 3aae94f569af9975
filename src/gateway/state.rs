use std::sync::Arc;

use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::db::Database;
use crate::ledger::TransferExecutor;
use crate::merchant_auth::ReplayGuard;
use crate::rate_limit::RateLimiter;
use crate::user_auth::UserAuthService;

/// Shared application state. Constructed once from config; components hold
/// no ambient globals. Replay nonces and rate buckets share one ephemeral
/// TTL store, keyed `nonce:*` and `rl:*` respectively.
pub struct AppState {
    pub db: Arc<Database>,
    pub user_auth: Arc<UserAuthService>,
    pub transfers: Arc<TransferExecutor>,
    pub rate_limiter: Arc<RateLimiter>,
    pub replay_guard: Arc<ReplayGuard>,
}

impl AppState {
    pub fn new(config: &AppConfig, db: Arc<Database>) -> Self {
        let cache = Arc::new(TtlCache::new());
        Self {
            user_auth: Arc::new(UserAuthService::new(
                db.pool().clone(),
                config.auth.clone(),
            )),
            transfers: Arc::new(TransferExecutor::new(db.pool().clone())),
            rate_limiter: Arc::new(RateLimiter::new(
                Arc::clone(&cache),
                config.security.rate_limit_per_minute,
            )),
            replay_guard: Arc::new(ReplayGuard::new(
                cache,
                config.security.replay_window_seconds,
            )),
            db,
        }
    }
}
