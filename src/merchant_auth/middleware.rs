//! Authentication middleware for merchant-facing routes.
//!
//! Verification order: rate limit, timestamp freshness, key lookup, nonce
//! consumption, HMAC verification. The raw body is buffered so the
//! signature covers exactly the bytes received, then handed back to the
//! handler untouched.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

use super::error::{AuthError, AuthErrorCode};
use super::repository::MerchantKeyRepository;
use super::signing::verify_signature;
use crate::gateway::state::AppState;
use crate::user_auth::service::parse_scopes;

/// Cap on buffered request bodies. Signed payloads are small JSON bodies.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Merchant identity established by signature verification, injected into
/// request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedMerchant {
    pub merchant_id: i64,
    pub key_id: String,
    pub scopes: Vec<String>,
}

impl AuthenticatedMerchant {
    /// Scope gate for merchant operations.
    pub fn require_scopes(&self, required: &[&str]) -> Result<(), AuthError> {
        let missing: Vec<&str> = required
            .iter()
            .filter(|s| !self.scopes.iter().any(|g| g == *s))
            .copied()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::new(
                AuthErrorCode::PermissionDenied,
                format!("Missing scopes: {}", missing.join(", ")),
            ))
        }
    }
}

fn required_header<'a>(
    headers: &'a axum::http::HeaderMap,
    name: &str,
) -> Result<&'a str, AuthError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AuthError::from_code(AuthErrorCode::MissingHeaders))
}

pub async fn merchant_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let (parts, body) = request.into_parts();

    // Step 1: required headers
    let key_id = required_header(&parts.headers, "X-Key-Id")?.to_string();
    let timestamp_str = required_header(&parts.headers, "X-Timestamp")?.to_string();
    let nonce = required_header(&parts.headers, "X-Nonce")?.to_string();
    let signature = required_header(&parts.headers, "X-Signature")?.to_string();

    // Step 2: rate limit per claimed key, before any crypto or DB work
    if !state.rate_limiter.allow(&format!("merchant:{}", key_id)) {
        return Err(AuthError::from_code(AuthErrorCode::RateLimited));
    }

    // Step 3: timestamp freshness
    let timestamp: i64 = timestamp_str
        .parse()
        .map_err(|_| AuthError::from_code(AuthErrorCode::BadTimestamp))?;
    if !state.replay_guard.is_fresh(timestamp) {
        return Err(AuthError::from_code(AuthErrorCode::StaleTimestamp));
    }

    // Step 4: resolve the signing key
    let key_record = MerchantKeyRepository::get_active_by_key_id(state.db.pool(), &key_id)
        .await
        .map_err(|e| AuthError::new(AuthErrorCode::InternalError, format!("DB error: {}", e)))?
        .ok_or_else(|| AuthError::from_code(AuthErrorCode::InvalidKeyId))?;

    // Step 5: consume the nonce (atomic single use per merchant)
    if !state
        .replay_guard
        .consume_nonce(key_record.merchant_id, &nonce)
    {
        return Err(AuthError::from_code(AuthErrorCode::NonceReplayed));
    }

    // Step 6: verify the signature over the raw body bytes
    let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AuthError::new(AuthErrorCode::InternalError, format!("Body read: {}", e)))?;

    if !verify_signature(
        &signature,
        &key_record.secret,
        parts.method.as_str(),
        parts.uri.path(),
        &timestamp_str,
        &nonce,
        &body_bytes,
    ) {
        return Err(AuthError::from_code(AuthErrorCode::InvalidSignature));
    }

    // Step 7: rebuild the request and inject the merchant identity
    let mut request = Request::from_parts(parts, Body::from(body_bytes));
    request.extensions_mut().insert(AuthenticatedMerchant {
        merchant_id: key_record.merchant_id,
        key_id: key_record.key_id,
        scopes: parse_scopes(&key_record.scopes),
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant(scopes: &str) -> AuthenticatedMerchant {
        AuthenticatedMerchant {
            merchant_id: 1,
            key_id: "MK_TEST".to_string(),
            scopes: parse_scopes(scopes),
        }
    }

    #[test]
    fn test_require_scopes_granted() {
        assert!(merchant("payments:write").require_scopes(&["payments:write"]).is_ok());
    }

    #[test]
    fn test_require_scopes_missing_names_scope() {
        let err = merchant("reports:read")
            .require_scopes(&["payments:write"])
            .unwrap_err();
        assert_eq!(err.code, AuthErrorCode::PermissionDenied);
        assert!(err.detail.contains("payments:write"));
    }
}
