//! Database collaborator of the API service.
//!
//! The API service depends only on whether a status read succeeds; the
//! [`StatusStore`] trait is that seam. [`postgres::PgStatusStore`] is the
//! production implementation.

pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use postgres::PgStatusStore;

/// One row of the status read: the database clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub time: String,
}

/// Errors from a status read.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not connect, or the pool is closed.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// No pooled connection became free in time.
    #[error("timed out waiting for a database connection")]
    Timeout,

    /// Connected, but the query itself failed.
    #[error("query failed: {0}")]
    Query(String),
}

/// Source of the status record served by `GET /api/status`.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Read the current status rows.
    async fn current_status(&self) -> Result<Vec<StatusRecord>, StoreError>;

    /// Store name for logs and metrics.
    fn name(&self) -> &'static str;
}
