use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds and checks the shared Postgres pool
pub struct DatabaseManager;

impl DatabaseManager {
    /// Create the pool without touching the network; connections open on first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if config.url.trim().is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(&config.url)?;

        info!(
            "Configured database pool (max_connections={}, acquire_timeout={}s)",
            config.max_connections, config.connection_timeout
        );
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(pool: &PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
