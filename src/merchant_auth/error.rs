//! Merchant authentication error types.
//!
//! Internally every rejection keeps a precise code so logs and tests can
//! tell a stale timestamp from a bad signature. Externally all of them
//! collapse into one uniform 401 body: which check failed is exactly the
//! oracle a forger wants.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::gateway::types::{ApiResponse, error_codes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// A required auth header is absent
    MissingHeaders,
    /// X-Timestamp is not an integer
    BadTimestamp,
    /// Timestamp outside the replay window
    StaleTimestamp,
    /// Key id unknown or key not active
    InvalidKeyId,
    /// Nonce already consumed within the window
    NonceReplayed,
    /// HMAC verification failed
    InvalidSignature,
    /// Key is valid but lacks a required scope
    PermissionDenied,
    /// Too many requests for this key
    RateLimited,
    /// Unexpected failure during verification
    InternalError,
}

impl AuthErrorCode {
    pub fn name(self) -> &'static str {
        match self {
            Self::MissingHeaders => "MISSING_HEADERS",
            Self::BadTimestamp => "BAD_TIMESTAMP",
            Self::StaleTimestamp => "STALE_TIMESTAMP",
            Self::InvalidKeyId => "INVALID_KEY_ID",
            Self::NonceReplayed => "NONCE_REPLAYED",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::RateLimited => "RATE_LIMITED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Authentication error with an internal detail message. The detail is
/// logged, never returned to the caller (except for scope failures, which
/// may name the missing scopes).
#[derive(Debug, Clone)]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub detail: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    pub fn from_code(code: AuthErrorCode) -> Self {
        let detail = match code {
            AuthErrorCode::MissingHeaders => "Missing merchant auth headers",
            AuthErrorCode::BadTimestamp => "X-Timestamp must be a unix timestamp in seconds",
            AuthErrorCode::StaleTimestamp => "Timestamp outside the replay window",
            AuthErrorCode::InvalidKeyId => "Unknown or inactive API key",
            AuthErrorCode::NonceReplayed => "Replay detected (nonce reused)",
            AuthErrorCode::InvalidSignature => "Signature verification failed",
            AuthErrorCode::PermissionDenied => "Insufficient scopes for this operation",
            AuthErrorCode::RateLimited => "Rate limit exceeded",
            AuthErrorCode::InternalError => "Internal server error",
        };
        Self::new(code, detail)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.code.name(), detail = %self.detail, "Merchant auth rejected");

        let (status, body) = match self.code {
            AuthErrorCode::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ApiResponse::<()>::error(error_codes::PERMISSION_DENIED, self.detail),
            ),
            AuthErrorCode::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiResponse::<()>::error(error_codes::RATE_LIMITED, "Rate limit exceeded"),
            ),
            AuthErrorCode::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::<()>::error(error_codes::INTERNAL_ERROR, "Internal server error"),
            ),
            // Uniform rejection: no hint about which check failed.
            _ => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::<()>::error(error_codes::AUTH_FAILED, "Merchant authentication failed"),
            ),
        };
        (status, Json(body)).into_response()
    }
}
