use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::{Amount, ApiResponse};
use crate::ledger::TransferResult;
use crate::user_auth::AuthenticatedUser;
use crate::user_auth::service::SCOPE_TRANSFERS_WRITE;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub from_account_id: i64,
    pub to_account_id: i64,
    #[schema(value_type = String, example = "50.00")]
    pub amount: Amount,
}

/// Execute a transfer between accounts
///
/// POST /api/v1/transfers
///
/// The `Idempotency-Key` header scopes "same logical operation" across
/// client retries: resubmitting with the same key returns the original
/// result with `replayed = true` instead of moving money again.
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = TransferRequest,
    params(
        ("Idempotency-Key" = String, Header, description = "Client-chosen retry token, unique per logical transfer")
    ),
    responses(
        (status = 201, description = "Transfer executed (or replayed)", body = ApiResponse<TransferResult>),
        (status = 400, description = "Invalid amount or insufficient funds"),
        (status = 403, description = "Source account not owned by caller"),
        (status = 404, description = "Account not found"),
        (status = 429, description = "Rate limit exceeded")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfers"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    Json(req): Json<TransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransferResult>>), ApiError> {
    user.require_scopes(&[SCOPE_TRANSFERS_WRITE])?;

    let idempotency_key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing Idempotency-Key header".to_string()))?;

    if !state
        .rate_limiter
        .allow(&format!("user:{}:transfers", user.user_id))
    {
        return Err(ApiError::RateLimited);
    }

    let result = state
        .transfers
        .execute(
            user.user_id,
            req.from_account_id,
            req.to_account_id,
            req.amount.inner(),
            idempotency_key,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}
