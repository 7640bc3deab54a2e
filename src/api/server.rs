//! API service lifecycle.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::api::{routes, ApiState};
use crate::config::AppConfig;
use crate::db::{PgStatusStore, StatusStore};
use crate::http::{build_router, serve, ServerError};

/// An owned API service instance with its routes registered.
pub struct ApiServer {
    router: Router,
    config: AppConfig,
}

impl ApiServer {
    /// Build the service around any status store.
    pub fn new(config: AppConfig, store: Arc<dyn StatusStore>) -> Result<Self, ServerError> {
        tracing::info!(
            store = store.name(),
            query_deadline_ms = config.timeouts.db_query_ms,
            "API service configured"
        );

        let state = ApiState {
            store,
            query_deadline: config.timeouts.db_query(),
        };
        let router = build_router(Arc::new(routes()?), state, &config.timeouts);

        Ok(Self { router, config })
    }

    /// Build the service around a lazily connected PostgreSQL pool.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: AppConfig) -> Result<Self, ServerError> {
        let store = PgStatusStore::connect_lazy(&config.database, &config.timeouts)?;
        Self::new(config, Arc::new(store))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The HTTP router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        serve("api", listener, self.router, shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{StatusRecord, StoreError};
    use crate::http::ErrorPayload;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::{Duration, Instant};
    use tower::ServiceExt;

    struct FixedStore;

    #[async_trait]
    impl StatusStore for FixedStore {
        async fn current_status(&self) -> Result<Vec<StatusRecord>, StoreError> {
            Ok(vec![StatusRecord {
                time: "2024-05-01 12:00:00+00".into(),
            }])
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct DownStore;

    #[async_trait]
    impl StatusStore for DownStore {
        async fn current_status(&self) -> Result<Vec<StatusRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        fn name(&self) -> &'static str {
            "down"
        }
    }

    struct HangingStore;

    #[async_trait]
    impl StatusStore for HangingStore {
        async fn current_status(&self) -> Result<Vec<StatusRecord>, StoreError> {
            std::future::pending().await
        }

        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    async fn get(server: &ApiServer, path: &str) -> (StatusCode, Vec<u8>) {
        let response = server
            .router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_status_ok() {
        let server = ApiServer::new(AppConfig::default(), Arc::new(FixedStore)).unwrap();
        let (status, body) = get(&server, "/api/status").await;
        assert_eq!(status, StatusCode::OK);

        let rows: Vec<StatusRecord> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rows[0].time, "2024-05-01 12:00:00+00");
    }

    #[tokio::test]
    async fn test_status_database_down() {
        let server = ApiServer::new(AppConfig::default(), Arc::new(DownStore)).unwrap();
        let (status, body) = get(&server, "/api/status").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let payload: ErrorPayload = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.message, "database unavailable");
    }

    #[tokio::test]
    async fn test_status_is_bounded_by_deadline() {
        let mut config = AppConfig::default();
        config.timeouts.db_query_ms = 100;
        let server = ApiServer::new(config, Arc::new(HangingStore)).unwrap();

        let start = Instant::now();
        let (status, body) = get(&server, "/api/status").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(start.elapsed() < Duration::from_secs(2));

        let payload: ErrorPayload = serde_json::from_slice(&body).unwrap();
        assert!(!payload.message.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout_answers_json_500() {
        let mut config = AppConfig::default();
        config.timeouts.request_secs = 1;
        config.timeouts.db_query_ms = 5_000;
        let server = ApiServer::new(config, Arc::new(HangingStore)).unwrap();

        let (status, body) = get(&server, "/api/status").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let payload: ErrorPayload = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.message, "request timed out");
    }

    #[tokio::test]
    async fn test_unknown_routes_are_json_404() {
        let server = ApiServer::new(AppConfig::default(), Arc::new(FixedStore)).unwrap();
        for path in ["/nonexistent", "/", "/api", "/api/status/extra", "/does/not/exist"] {
            let (status, body) = get(&server, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "path {}", path);
            let payload: ErrorPayload = serde_json::from_slice(&body).unwrap();
            assert!(!payload.message.is_empty());
        }
    }

    #[tokio::test]
    async fn test_wrong_method_falls_through_to_404() {
        let server = ApiServer::new(AppConfig::default(), Arc::new(FixedStore)).unwrap();
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
