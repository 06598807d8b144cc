use anyhow::Context;
use tracing_subscriber::EnvFilter;

use innexar_api::app::{app, AppState};
use innexar_api::config;
use innexar_api::database::DatabaseManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, BACKEND_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")))
        .init();

    let config = config::config().clone();
    tracing::info!("Starting Innexar API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in {:?} mode", config.environment);
    }

    let pool = if config.database.run_migrations {
        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::migrate(&pool).await?;
        pool
    } else {
        DatabaseManager::connect_lazy(&config.database)?
    };

    let port = config.server.port;
    let state = AppState::new(pool, config).context("failed to build backend HTTP client")?;
    tracing::info!("Proxying CRM routes to {}", state.proxy.base_url());

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Innexar API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
