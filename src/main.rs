use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let env = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("APP_ENV").ok())
        .unwrap_or_else(|| "dev".to_string());

    let config = vaultpay::config::AppConfig::load(&env);
    let _log_guard = vaultpay::logging::init_logging(&config);
    tracing::info!(env = %env, "Starting VaultPay gateway");

    let db = Arc::new(vaultpay::db::Database::connect(&config.postgres_url).await?);
    db.health_check().await?;

    vaultpay::gateway::run_server(&config, db).await
}
