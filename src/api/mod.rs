//! API service: JSON endpoints backed by the database.
//!
//! # Routes
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/api/status` | [`handlers::status`] |
//! | * | anything else | [`handlers::not_found`] (404 JSON) |

pub mod handlers;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;

use crate::db::StatusStore;
use crate::routing::{PatternError, RouteTable};

pub use server::ApiServer;

/// State handed to every API handler.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn StatusStore>,
    pub query_deadline: Duration,
}

/// The API service's route table.
pub fn routes() -> Result<RouteTable<ApiState>, PatternError> {
    Ok(RouteTable::builder("api")
        .route(Method::GET, "/api/status", "status", handlers::status)?
        .fallback(handlers::not_found))
}
