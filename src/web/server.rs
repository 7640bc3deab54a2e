//! Web service lifecycle.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use crate::config::AppConfig;
use crate::http::{build_router, serve, ServerError};
use crate::web::client::{ApiClient, UpstreamSettings};
use crate::web::{routes, views, WebState};

/// An owned web service instance: routes registered, engine resolved.
pub struct WebServer {
    router: Router,
    config: AppConfig,
    client: Arc<ApiClient>,
    view_engine: &'static str,
}

impl WebServer {
    /// Resolve the view engine and register routes.
    ///
    /// A missing API address is not an error here; it surfaces per request.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let engine = views::engine_for(&config.web.view_engine)
            .ok_or_else(|| ServerError::UnknownViewEngine(config.web.view_engine.clone()))?;
        let view_engine = engine.name();

        let client = Arc::new(ApiClient::from_config(&config));
        let state = WebState {
            client: client.clone(),
            engine,
            title: Arc::from(config.web.title.as_str()),
        };

        let router = build_router(Arc::new(routes()?), state, &config.timeouts);

        if config.web.api_host.is_none() {
            tracing::warn!("No API address configured; pages will render as errors until one is set");
        }
        tracing::info!(view_engine, api_host = ?config.web.api_host, "Web service configured");

        Ok(Self {
            router,
            config,
            client,
            view_engine,
        })
    }

    /// Name of the registered view engine.
    pub fn view_engine(&self) -> &'static str {
        self.view_engine
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The HTTP router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configs arriving on `config_updates` replace the upstream settings;
    /// routes and the view engine stay as constructed.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let client = self.client.clone();
        let mut reload_shutdown = shutdown.resubscribe();

        let reloader = tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => client.update(UpstreamSettings::from_config(&config)),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        let result = serve("web", listener, self.router, shutdown).await;
        reloader.abort();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get(server: &WebServer, path: &str) -> (StatusCode, String) {
        let response = server
            .router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_view_engine_is_queryable() {
        let server = WebServer::new(AppConfig::default()).unwrap();
        assert_eq!(server.view_engine(), "maud");
        assert_eq!(server.view_engine(), server.config().web.view_engine);
    }

    #[test]
    fn test_unknown_view_engine_rejected() {
        let mut config = AppConfig::default();
        config.web.view_engine = "jade".into();
        assert!(matches!(
            WebServer::new(config),
            Err(ServerError::UnknownViewEngine(name)) if name == "jade"
        ));
    }

    #[tokio::test]
    async fn test_root_without_api_host_is_server_error() {
        let server = WebServer::new(AppConfig::default()).unwrap();
        let (status, body) = get(&server, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("api not configured"));
    }

    #[tokio::test]
    async fn test_unknown_route_renders_404_page() {
        let server = WebServer::new(AppConfig::default()).unwrap();
        let (status, body) = get(&server, "/this/does/not/exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<h1>Not Found</h1>"));
    }

    #[tokio::test]
    async fn test_request_timeout_answers_json_500() {
        // Accepts connections but never answers.
        let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = AppConfig::default();
        config.web.api_host = Some(silent.local_addr().unwrap().to_string());
        config.timeouts.request_secs = 1;
        config.timeouts.upstream_ms = 5_000;
        let server = WebServer::new(config).unwrap();

        let (status, body) = get(&server, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let payload: crate::http::ErrorPayload = serde_json::from_str(&body).unwrap();
        assert_eq!(payload.message, "request timed out");
        drop(silent);
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let server = WebServer::new(AppConfig::default()).unwrap();
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }
}
