use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;
use crate::ledger::{AccountRepository, BalanceCalculator};
use crate::user_auth::AuthenticatedUser;
use crate::user_auth::service::SCOPE_ACCOUNTS_READ;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = "GBP")]
    pub currency: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: i64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub account_id: i64,
    pub currency: String,
    #[schema(value_type = String, example = "100.00")]
    pub balance: Decimal,
}

/// Open a new account
///
/// POST /api/v1/accounts
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid currency"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    user.require_scopes(&[SCOPE_ACCOUNTS_READ])?;

    let currency = req.currency.trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::Validation(
            "Currency must be a 3-letter code".to_string(),
        ));
    }

    let account = AccountRepository::create(state.db.pool(), user.user_id, &currency).await?;
    tracing::info!(account_id = account.account_id, user_id = user.user_id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountResponse {
            id: account.account_id,
            currency: account.currency,
            status: account.status.as_str().to_string(),
        })),
    ))
}

/// Get an account's current balance
///
/// GET /api/v1/accounts/{account_id}/balance
///
/// The balance is derived from committed ledger entries at read time.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/balance",
    params(
        ("account_id" = i64, Path, description = "Account to read")
    ),
    responses(
        (status = 200, description = "Current balance", body = ApiResponse<BalanceResponse>),
        (status = 404, description = "Account missing or not owned by caller"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(account_id): Path<i64>,
) -> Result<Json<ApiResponse<BalanceResponse>>, ApiError> {
    user.require_scopes(&[SCOPE_ACCOUNTS_READ])?;

    // Missing and not-owned are indistinguishable to the caller.
    let account = AccountRepository::get_by_id(state.db.pool(), account_id)
        .await?
        .filter(|a| a.user_id == user.user_id)
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let balance = BalanceCalculator::balance(state.db.pool(), account_id).await?;

    Ok(Json(ApiResponse::success(BalanceResponse {
        account_id,
        currency: account.currency,
        balance,
    })))
}
