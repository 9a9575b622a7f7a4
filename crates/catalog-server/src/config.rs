use serde::{Deserialize, Serialize};

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

/// Token-issuance configuration. `token_expire_hours` is typed, so a
/// malformed value fails YAML parsing at startup rather than at the
/// first login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_expire_hours: i64,
}

/// Server configuration loaded from YAML at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
}
