use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::ApiResponse;

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "user1@example.com")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[schema(example = "password123")]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
}

/// User Login Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "user1@example.com")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub scopes: Vec<String>,
}

fn validate_body<T: Validate>(body: &T) -> Result<(), ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))
}

/// Register a new user
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<RegisterResponse>),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    validate_body(&req)?;

    let user = state.user_auth.register(&req.email, &req.password).await?;
    tracing::info!(user_id = user.user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RegisterResponse {
            id: user.user_id,
            email: user.email,
        })),
    ))
}

/// Login and obtain a scoped bearer token
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many attempts")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    validate_body(&req)?;

    // Brute-force protection, keyed by normalized email.
    let rate_key = format!("login:{}", req.email.to_lowercase());
    if !state.rate_limiter.allow(&rate_key) {
        return Err(ApiError::RateLimited);
    }

    let (token, scopes) = state.user_auth.login(&req.email, &req.password).await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        token_type: "bearer".to_string(),
        scopes,
    })))
}
