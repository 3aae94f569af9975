use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;

use super::service;

/// End user authenticated by a bearer token, injected into request
/// extensions for handlers to consume.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    /// Scope set carried by the token, not re-read from the database.
    pub scopes: Vec<String>,
}

impl AuthenticatedUser {
    /// Authorization check: every required scope must be granted.
    pub fn require_scopes(&self, required: &[&str]) -> Result<(), ApiError> {
        service::require_scopes(&self.scopes, required).map_err(ApiError::from)
    }
}

/// Axum middleware for bearer-token authentication.
///
/// Verifies the token (signature, issuer, audience, expiry), confirms the
/// subject is still an active user and injects [`AuthenticatedUser`].
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::MissingAuth)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Authentication("Invalid token format".to_string()))?;

    let claims = state.user_auth.verify_token(token)?;
    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::Authentication("Invalid or expired token".to_string()))?;

    state
        .user_auth
        .load_active_user(user_id)
        .await?
        .ok_or_else(|| ApiError::Authentication("User not found or inactive".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        scopes: claims.scopes,
    });

    Ok(next.run(request).await)
}
