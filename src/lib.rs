//! VaultPay: money movement over an idempotent double-entry ledger,
//! guarded by scoped bearer tokens and HMAC-signed merchant requests.
//!
//! # Modules
//!
//! - [`ledger`] - Accounts, append-only entries, balances, transfer executor
//! - [`user_auth`] - Registration, login, scoped bearer tokens
//! - [`merchant_auth`] - Canonical request signing, replay guard, key lookup
//! - [`rate_limit`] - Fixed-window request rate limiting
//! - [`cache`] - Ephemeral TTL store backing nonces and rate buckets
//! - [`gateway`] - Axum router, handlers, error taxonomy
//! - [`db`] - PostgreSQL pool management

pub mod cache;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod merchant_auth;
pub mod rate_limit;
pub mod user_auth;
