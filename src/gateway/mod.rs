pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::db::Database;
use crate::merchant_auth::merchant_auth_middleware;
use crate::user_auth::jwt_auth_middleware;
use state::AppState;

/// Build the gateway router. Split out from [`run_server`] so tests can
/// drive the full middleware stack without binding a socket.
pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(crate::user_auth::handlers::register))
        .route("/login", post(crate::user_auth::handlers::login));

    // Bearer-token protected: account management and transfers.
    let account_routes = Router::new()
        .route("/", post(handlers::accounts::create_account))
        .route("/{account_id}/balance", get(handlers::accounts::get_balance))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let transfer_routes = Router::new()
        .route("/", post(handlers::transfers::create_transfer))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    // Signature protected: merchant-facing operations.
    let merchant_routes = Router::new()
        .route("/payments", post(handlers::payments::create_payment))
        .layer(from_fn_with_state(state.clone(), merchant_auth_middleware));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/accounts", account_routes)
        .nest("/api/v1/transfers", transfer_routes)
        .nest("/api/v1/merchant", merchant_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

pub async fn run_server(config: &AppConfig, db: Arc<Database>) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config, db));
    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
