//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
            components.add_security_scheme(
                "merchant_hmac",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-Signature",
                    r#"HMAC-signed request. Required headers: X-Key-Id, X-Timestamp (unix
seconds), X-Nonce (single use per merchant), X-Signature.

Signature = hex(HMAC-SHA256(secret, canonical)) where
canonical = METHOD|PATH|TIMESTAMP|NONCE|hex(SHA-256(raw body))"#,
                ))),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VaultPay API",
        version = "0.1.0",
        description = "Money movement over an idempotent double-entry ledger, with scoped bearer tokens and HMAC-signed merchant requests.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::gateway::handlers::accounts::create_account,
        crate::gateway::handlers::accounts::get_balance,
        crate::gateway::handlers::transfers::create_transfer,
        crate::gateway::handlers::payments::create_payment,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "User registration and login"),
        (name = "Accounts", description = "Account management and balances"),
        (name = "Transfers", description = "Idempotent money movement"),
        (name = "Merchant", description = "Signed merchant operations"),
    )
)]
pub struct ApiDoc;
