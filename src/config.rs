use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL for accounts, ledger and credentials
    pub postgres_url: String,
    pub auth: AuthConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Bearer credential settings. The secret signs HS256 tokens; issuer and
/// audience are enforced on every verification.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SecurityConfig {
    /// Signed requests must carry a timestamp within this many seconds of
    /// server time; consumed nonces are tracked for the same interval.
    pub replay_window_seconds: i64,
    /// Fixed-window ceiling applied to every rate-limited key.
    pub rate_limit_per_minute: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            replay_window_seconds: 300,
            rate_limit_per_minute: 60,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
log_level: "info"
log_dir: "./logs"
log_file: "vaultpay.log"
use_json: false
rotation: "daily"
gateway:
  host: "127.0.0.1"
  port: 8080
postgres_url: "postgresql://u:p@localhost/vaultpay"
auth:
  jwt_issuer: "vaultpay"
  jwt_audience: "vaultpay-api"
  jwt_secret: "secret"
  jwt_ttl_seconds: 3600
security:
  replay_window_seconds: 120
  rate_limit_per_minute: 30
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gateway.port, 8080);
        assert_eq!(cfg.auth.jwt_ttl_seconds, 3600);
        assert_eq!(cfg.security.replay_window_seconds, 120);
        assert_eq!(cfg.security.rate_limit_per_minute, 30);
    }

    #[test]
    fn test_security_defaults() {
        let yaml = r#"
log_level: "info"
log_dir: "./logs"
log_file: "vaultpay.log"
use_json: true
rotation: "never"
gateway:
  host: "127.0.0.1"
  port: 9090
postgres_url: "postgresql://u:p@localhost/vaultpay"
auth:
  jwt_issuer: "vaultpay"
  jwt_audience: "vaultpay-api"
  jwt_secret: "secret"
  jwt_ttl_seconds: 600
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.security.replay_window_seconds, 300);
        assert_eq!(cfg.security.rate_limit_per_minute, 60);
    }
}
