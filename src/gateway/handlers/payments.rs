use axum::{Extension, Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::gateway::types::{Amount, ApiResponse};
use crate::merchant_auth::SCOPE_PAYMENTS_WRITE;
use crate::merchant_auth::error::AuthError;
use crate::merchant_auth::middleware::AuthenticatedMerchant;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    #[schema(value_type = String, example = "25.00")]
    pub amount: Amount,
    /// Merchant-side order identifier, echoed back for reconciliation.
    #[schema(example = "order-8812")]
    pub order_ref: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentAck {
    pub merchant_id: i64,
    pub key_id: String,
    /// Server-assigned payment reference.
    #[schema(example = "pay_1a2b3c4d5e6f7081")]
    pub payment_ref: String,
    #[schema(value_type = String, example = "25.00")]
    pub amount: Amount,
    pub order_ref: Option<String>,
    pub status: String,
}

/// Accept a signed merchant payment request
///
/// POST /api/v1/merchant/payments
///
/// The merchant-auth middleware has already verified rate limits,
/// timestamp freshness, nonce single-use and the HMAC signature before
/// this handler runs; it only gates on scope and acknowledges. Settlement
/// with external rails happens out-of-band.
#[utoipa::path(
    post,
    path = "/api/v1/merchant/payments",
    request_body = PaymentRequest,
    responses(
        (status = 202, description = "Payment accepted", body = ApiResponse<PaymentAck>),
        (status = 401, description = "Merchant authentication failed"),
        (status = 403, description = "Key lacks payments:write"),
        (status = 429, description = "Rate limit exceeded")
    ),
    security(("merchant_hmac" = [])),
    tag = "Merchant"
)]
pub async fn create_payment(
    Extension(merchant): Extension<AuthenticatedMerchant>,
    Json(req): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentAck>>), AuthError> {
    merchant.require_scopes(&[SCOPE_PAYMENTS_WRITE])?;

    let ref_bytes: [u8; 8] = rand::random();
    let payment_ref = format!("pay_{}", hex::encode(ref_bytes));
    tracing::info!(
        merchant_id = merchant.merchant_id,
        key_id = %merchant.key_id,
        payment_ref = %payment_ref,
        "Merchant payment accepted"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(PaymentAck {
            merchant_id: merchant.merchant_id,
            key_id: merchant.key_id,
            payment_ref,
            amount: req.amount,
            order_ref: req.order_ref,
            status: "accepted".to_string(),
        })),
    ))
}
