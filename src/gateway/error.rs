//! Gateway error taxonomy.
//!
//! Every externally visible failure carries a stable code and a reason but
//! never internal state. Authentication failures are uniform; authorization
//! failures may name the missing scopes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::types::{ApiResponse, error_codes};
use crate::ledger::TransferError;
use crate::user_auth::AuthServiceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing Authorization header")]
    MissingAuth,
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAuth => StatusCode::UNAUTHORIZED,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            ApiError::MissingAuth => error_codes::MISSING_AUTH,
            ApiError::Authentication(_) => error_codes::AUTH_FAILED,
            ApiError::Authorization(_) => error_codes::PERMISSION_DENIED,
            ApiError::NotFound(_) => error_codes::NOT_FOUND,
            ApiError::Conflict(_) => error_codes::CONFLICT,
            ApiError::Validation(_) => error_codes::INVALID_PARAMETER,
            ApiError::RateLimited => error_codes::RATE_LIMITED,
            ApiError::Internal => error_codes::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::AccountNotFound => ApiError::NotFound("Account not found".to_string()),
            TransferError::NotSourceOwner => {
                ApiError::Authorization("Not your source account".to_string())
            }
            TransferError::InvalidAmount | TransferError::InsufficientFunds => {
                ApiError::Validation(e.to_string())
            }
            TransferError::Database(db) => {
                tracing::error!(error = %db, "Transfer failed");
                ApiError::Internal
            }
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(e: AuthServiceError) -> Self {
        match e {
            AuthServiceError::InvalidCredentials | AuthServiceError::InvalidToken => {
                ApiError::Authentication(e.to_string())
            }
            AuthServiceError::EmailTaken => ApiError::Conflict(e.to_string()),
            AuthServiceError::MissingScopes(_) => ApiError::Authorization(e.to_string()),
            AuthServiceError::Hashing => {
                tracing::error!("Password hashing failed");
                ApiError::Internal
            }
            AuthServiceError::Database(db) => {
                tracing::error!(error = %db, "Auth query failed");
                ApiError::Internal
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        ApiError::Internal
    }
}
