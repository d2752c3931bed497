mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::config::{ConfigError, ServerConfig};
use crate::services::layout::{LayoutStore, MemoryLayoutStore, PgLayoutStore};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "layoutboard failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    let store: Arc<dyn LayoutStore> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections).await?;
            tracing::info!(max_connections = config.db_max_connections, "postgres layout store ready");
            Arc::new(PgLayoutStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; layouts kept in memory only");
            Arc::new(MemoryLayoutStore::new())
        }
    };
    let state = state::AppState::new(store);

    let app = routes::app(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, "layoutboard listening");
    axum::serve(listener, app).await?;
    Ok(())
}
