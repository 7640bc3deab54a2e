//! Two-tier web services: a JSON API backed by PostgreSQL and a
//! server-rendered web front end that calls it.

pub mod api;
pub mod config;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod web;

pub use api::ApiServer;
pub use config::AppConfig;
pub use lifecycle::Shutdown;
pub use web::WebServer;
