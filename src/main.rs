use anyhow::Context;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use sanctuary_api::access::RoleTable;
use sanctuary_api::config::config;
use sanctuary_api::database::DatabaseManager;
use sanctuary_api::handlers::{app, AppState};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting Sanctuary API in {:?} mode", config.environment);

    if sanctuary_api::is_production!() && config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    let roles = RoleTable::from_config(config.security.roles_file.as_deref())
        .context("failed to load account roles")?;
    tracing::info!("Loaded {} account role entries", roles.len());

    let session_ttl = Duration::from_secs(config.security.jwt_expiry_hours * 3600);
    let manager = DatabaseManager::from_env(config.database.clone())
        .context("invalid DATABASE_URL")?
        .with_session_ttl(session_ttl);
    let state = AppState::new(manager, roles, config.clone());
    let manager = state.manager.clone();

    let sweeper = {
        let manager = manager.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let evicted = manager.evict_expired().await;
                if evicted > 0 {
                    tracing::info!("Evicted {} expired sessions", evicted);
                }
            }
        })
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Sanctuary API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.abort();
    manager.close_all().await;
    tracing::info!("All session pools closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
