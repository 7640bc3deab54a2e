//! PostgreSQL status store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::{DatabaseConfig, TimeoutConfig};
use crate::db::{StatusRecord, StatusStore, StoreError};

const STATUS_QUERY: &str = "SELECT now()::text AS time";

/// Reads the database clock through a lazily connected pool.
///
/// No connection is attempted at construction, so the API service starts
/// and serves its other routes while the database is down.
#[derive(Debug, Clone)]
pub struct PgStatusStore {
    pool: PgPool,
}

impl PgStatusStore {
    pub fn connect_lazy(config: &DatabaseConfig, timeouts: &TimeoutConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(timeouts.db_acquire())
            .connect_lazy(&config.connection_url())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!(
            host = %config.host,
            database = %config.name,
            max_connections = config.max_connections,
            "Database pool configured (lazy)"
        );

        Ok(Self { pool })
    }
}

#[async_trait]
impl StatusStore for PgStatusStore {
    async fn current_status(&self) -> Result<Vec<StatusRecord>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(STATUS_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(|(time,)| StatusRecord { time }).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}
