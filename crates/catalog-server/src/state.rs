use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenIssuer;
use crate::config::ServerConfig;

/// Shared application state. The pool and issuer are cheap to clone;
/// per-request transactional state lives in each handler's unit of
/// work, never here.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub issuer: TokenIssuer,
}

impl AppState {
    pub fn new(pool: PgPool, config: ServerConfig, issuer: TokenIssuer) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            issuer,
        }
    }
}
