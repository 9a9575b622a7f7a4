use anyhow::{Context, Result};
use catalog_db::{create_pool, run_migrations};
use catalog_server::auth::TokenIssuer;
use catalog_server::config::ServerConfig;
use catalog_server::state::AppState;
use catalog_server::web::build_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting catalog server");

    // Load configuration
    let config_path =
        std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| "server-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);

    let config_content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path))?;

    let config: ServerConfig = serde_yml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file: {}", config_path))?;

    // Token issuance parameters are checked up front; a short secret
    // or a bad lifetime aborts here, not at the first login.
    let issuer = TokenIssuer::from_config(&config.auth).context("Invalid auth configuration")?;

    // Create database pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let listen = config.listen.clone();
    let state = AppState::new(pool, config, issuer);
    let router = build_router(state);

    tracing::info!("Listening on {}", listen);
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind {}", listen))?;
    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}
