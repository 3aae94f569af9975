//! End-to-end signed-request flow against the in-process security
//! substrate: canonical signing, freshness window, single-use nonces and
//! the fixed-window rate limiter, composed in the same order as the
//! merchant middleware.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use vaultpay::cache::TtlCache;
use vaultpay::merchant_auth::{ReplayGuard, canonical_string, sign, verify_signature};
use vaultpay::rate_limit::RateLimiter;

const SECRET: &str = "0f3a9c61e4b8d2758d90c1a6b4e7f3021d5c8a9e6f0b3d7c2a1e4f5b6c7d8e9f";
const MERCHANT_ID: i64 = 7;

struct SignedRequest {
    method: &'static str,
    path: &'static str,
    timestamp: String,
    nonce: String,
    body: Vec<u8>,
    signature: String,
}

fn signed_request(nonce: &str, body: &[u8]) -> SignedRequest {
    let timestamp = Utc::now().timestamp().to_string();
    let canonical = canonical_string("POST", "/api/v1/merchant/payments", &timestamp, nonce, body);
    SignedRequest {
        method: "POST",
        path: "/api/v1/merchant/payments",
        timestamp,
        nonce: nonce.to_string(),
        body: body.to_vec(),
        signature: sign(SECRET, &canonical),
    }
}

/// The middleware's verification sequence: rate limit, freshness, nonce,
/// signature. Returns Err(reason) at the first failing gate.
fn admit(
    limiter: &RateLimiter,
    guard: &ReplayGuard,
    req: &SignedRequest,
) -> Result<(), &'static str> {
    if !limiter.allow("merchant:MK_TEST") {
        return Err("rate_limited");
    }
    let ts: i64 = req.timestamp.parse().map_err(|_| "bad_timestamp")?;
    if !guard.is_fresh(ts) {
        return Err("stale_timestamp");
    }
    if !guard.consume_nonce(MERCHANT_ID, &req.nonce) {
        return Err("replay");
    }
    if !verify_signature(
        &req.signature,
        SECRET,
        req.method,
        req.path,
        &req.timestamp,
        &req.nonce,
        &req.body,
    ) {
        return Err("bad_signature");
    }
    Ok(())
}

fn substrate(limit: u32) -> (RateLimiter, ReplayGuard) {
    let cache = Arc::new(TtlCache::new());
    (
        RateLimiter::new(Arc::clone(&cache), limit),
        ReplayGuard::new(cache, 300),
    )
}

#[test]
fn fresh_signed_request_is_admitted_once() {
    let (limiter, guard) = substrate(60);
    let req = signed_request("n1", br#"{"amount":"25.00"}"#);

    assert_eq!(admit(&limiter, &guard, &req), Ok(()));
    // Byte-identical replay hits the nonce gate.
    assert_eq!(admit(&limiter, &guard, &req), Err("replay"));
}

#[test]
fn stale_timestamp_rejected_even_with_fresh_nonce() {
    let (limiter, guard) = substrate(60);
    let stale_ts = (Utc::now().timestamp() - 301).to_string();
    let canonical = canonical_string("POST", "/api/v1/merchant/payments", &stale_ts, "n2", b"");
    let req = SignedRequest {
        method: "POST",
        path: "/api/v1/merchant/payments",
        timestamp: stale_ts,
        nonce: "n2".to_string(),
        body: vec![],
        signature: sign(SECRET, &canonical),
    };

    // Signature is valid; freshness alone rejects the capture.
    assert_eq!(admit(&limiter, &guard, &req), Err("stale_timestamp"));
}

#[test]
fn tampered_body_rejected_after_nonce_burn() {
    let (limiter, guard) = substrate(60);
    let mut req = signed_request("n3", br#"{"amount":"25.00"}"#);
    req.body = br#"{"amount":"9925.00"}"#.to_vec();

    assert_eq!(admit(&limiter, &guard, &req), Err("bad_signature"));
    // The nonce was consumed by the forged attempt; the original cannot
    // be submitted afterwards.
    let original = signed_request("n3", br#"{"amount":"25.00"}"#);
    assert_eq!(admit(&limiter, &guard, &original), Err("replay"));
}

#[test]
fn nonces_are_scoped_per_merchant() {
    let cache = Arc::new(TtlCache::new());
    let guard = ReplayGuard::new(cache, 300);

    assert!(guard.consume_nonce(1, "shared"));
    assert!(guard.consume_nonce(2, "shared"));
    assert!(!guard.consume_nonce(1, "shared"));
}

#[test]
fn rate_limit_gates_before_any_crypto() {
    let (limiter, guard) = substrate(3);

    for i in 0..3 {
        let req = signed_request(&format!("rl_{}", i), b"");
        assert_eq!(admit(&limiter, &guard, &req), Ok(()));
    }
    // Fourth call in the window is rejected even though its signature and
    // nonce are valid.
    let req = signed_request("rl_3", b"");
    assert_eq!(admit(&limiter, &guard, &req), Err("rate_limited"));
}

#[test]
fn distinct_nonce_same_payload_is_a_new_request() {
    let (limiter, guard) = substrate(60);
    let body = br#"{"amount":"25.00","order_ref":"order-1"}"#;

    assert_eq!(admit(&limiter, &guard, &signed_request("a", body)), Ok(()));
    assert_eq!(admit(&limiter, &guard, &signed_request("b", body)), Ok(()));
}

#[test]
fn nonce_tracking_expires_with_the_window() {
    let cache = Arc::new(TtlCache::new());
    let guard = ReplayGuard::new(Arc::clone(&cache), 0);

    assert!(guard.consume_nonce(MERCHANT_ID, "short"));
    std::thread::sleep(Duration::from_millis(10));
    assert!(guard.consume_nonce(MERCHANT_ID, "short"));
}
