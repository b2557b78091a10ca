mod config;
mod db;
mod errors;
mod models;
mod pipeline;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::pipeline::scoring::RuleScorer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, PipelineStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing connection string)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    if config.reload {
        warn!("APP_RELOAD is set but hot reload is not supported; restart the process to apply changes");
    }

    // Initialize storage
    let (store, db) = match config.store {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let pool = create_pool(url, &config.db_sslmode, config.db_max_connections).await?;
            let store: Arc<dyn PipelineStore> = Arc::new(PgStore::new(pool.clone()));
            (store, Some(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            let store: Arc<dyn PipelineStore> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };
    info!("Store initialized (backend: {})", store.backend());

    let scorer = Arc::new(RuleScorer);

    // Build app state
    let state = AppState {
        store,
        db,
        scorer,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("APP_HOST '{}' is not a valid IP address", config.host))?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
