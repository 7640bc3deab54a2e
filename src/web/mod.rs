//! Web service: server-rendered pages backed by the API service.
//!
//! # Routes
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`handlers::index`] |
//! | * | anything else | [`handlers::not_found`] (404 error page) |

pub mod client;
pub mod handlers;
pub mod server;
pub mod views;

use std::sync::Arc;

use axum::http::Method;

use crate::routing::{PatternError, RouteTable};

pub use client::{ApiClient, UpstreamError, UpstreamSettings};
pub use server::WebServer;
pub use views::{View, ViewEngine};

/// State handed to every web handler.
#[derive(Clone)]
pub struct WebState {
    pub client: Arc<ApiClient>,
    pub engine: Arc<dyn ViewEngine>,
    pub title: Arc<str>,
}

/// The web service's route table.
pub fn routes() -> Result<RouteTable<WebState>, PatternError> {
    Ok(RouteTable::builder("web")
        .route(Method::GET, "/", "index", handlers::index)?
        .fallback(handlers::not_found))
}
