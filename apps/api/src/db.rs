use std::str::FromStr;

use anyhow::{Context, Result};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Postgres};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

/// Builds connect options from a normalised DSN plus an explicit SSL mode.
pub fn connect_options(database_url: &str, sslmode: &str) -> Result<PgConnectOptions> {
    let ssl_mode = PgSslMode::from_str(sslmode)
        .with_context(|| format!("DB_SSLMODE '{sslmode}' is not a valid PostgreSQL SSL mode"))?;
    let options = PgConnectOptions::from_str(database_url)
        .context("DATABASE_URL could not be parsed as a PostgreSQL connection string")?;
    Ok(options.ssl_mode(ssl_mode))
}

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(
    database_url: &str,
    sslmode: &str,
    max_connections: u32,
) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options(database_url, sslmode)?)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// A connection checked out for the lifetime of one request.
///
/// Returned to the pool when dropped, on success and error paths alike.
pub struct DbConn(pub PoolConnection<Postgres>);

#[async_trait]
impl FromRequestParts<AppState> for DbConn {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let pool = state.db.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable(
                "No database is configured for this deployment".to_string(),
            )
        })?;
        Ok(DbConn(pool.acquire().await?))
    }
}
