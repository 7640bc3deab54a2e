//! HTTP client for calls from the web service to the API service.
//!
//! # Responsibilities
//! - Resolve the configured API address into a request URI
//! - Issue `GET /api/status` with a deadline, forwarding the request ID
//! - Classify every failure into an [`UpstreamError`]
//!
//! # Design Decisions
//! - The address is read per call from a hot-swappable snapshot, so a
//!   config reload takes effect without restarting the service
//! - An address without a scheme is taken as `http://`
//! - No retries: the first failure is returned to the handler

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::Url;

use crate::config::AppConfig;
use crate::db::StatusRecord;
use crate::http::{HandlerError, X_REQUEST_ID};
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// Path of the status endpoint on the API service.
pub const STATUS_PATH: &str = "/api/status";

/// Largest API response body accepted.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Label used for the API service in errors and logs.
const UPSTREAM: &str = "api";

/// Failures of a call to the API service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("API address is not configured (set web.api_host or API_HOST)")]
    NotConfigured,

    #[error("API address '{address}' is invalid: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("API unreachable: {0}")]
    Unreachable(String),

    #[error("API did not answer within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("API answered with status {0}")]
    Status(u16),

    #[error("API response could not be decoded: {0}")]
    Decode(String),

    #[error("API returned no status rows")]
    Empty,
}

impl UpstreamError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            UpstreamError::NotConfigured | UpstreamError::InvalidAddress { .. } => "not_configured",
            UpstreamError::Unreachable(_) => "unreachable",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Status(_) => "error_status",
            UpstreamError::Decode(_) | UpstreamError::Empty => "bad_body",
        }
    }
}

impl From<UpstreamError> for HandlerError {
    fn from(err: UpstreamError) -> Self {
        let detail = err.to_string();
        match err {
            UpstreamError::NotConfigured | UpstreamError::InvalidAddress { .. } => {
                HandlerError::ConfigurationMissing { upstream: UPSTREAM, detail }
            }
            UpstreamError::Unreachable(_) | UpstreamError::Timeout(_) => {
                HandlerError::UpstreamUnavailable { upstream: UPSTREAM, detail }
            }
            UpstreamError::Status(_) | UpstreamError::Decode(_) | UpstreamError::Empty => {
                HandlerError::UpstreamError { upstream: UPSTREAM, detail }
            }
        }
    }
}

/// The reloadable part of the client's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub api_host: Option<String>,
    pub deadline: Duration,
}

impl UpstreamSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_host: config.web.api_host.clone(),
            deadline: config.timeouts.upstream(),
        }
    }
}

/// Resolve `path` against the configured API address.
pub fn resolve_endpoint(api_host: Option<&str>, path: &str) -> Result<Uri, UpstreamError> {
    let address = api_host
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(UpstreamError::NotConfigured)?;

    let invalid = |reason: String| UpstreamError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let with_scheme = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };

    let base = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    if base.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }
    if base.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    let endpoint = base.join(path).map_err(|e| invalid(e.to_string()))?;
    endpoint
        .as_str()
        .parse::<Uri>()
        .map_err(|e| invalid(e.to_string()))
}

/// Client for the API service.
pub struct ApiClient {
    client: Client<HttpConnector, Body>,
    settings: ArcSwap<UpstreamSettings>,
}

impl ApiClient {
    pub fn new(settings: UpstreamSettings, connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            settings: ArcSwap::from_pointee(settings),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            UpstreamSettings::from_config(config),
            config.timeouts.upstream_connect(),
        )
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<UpstreamSettings> {
        self.settings.load_full()
    }

    /// Replace the settings used by subsequent calls.
    pub fn update(&self, settings: UpstreamSettings) {
        let previous = self.settings.swap(Arc::new(settings));
        let current = self.settings.load();
        if *previous != **current {
            tracing::info!(
                api_host = ?current.api_host,
                deadline_ms = current.deadline.as_millis() as u64,
                "Upstream settings updated"
            );
        }
    }

    /// Fetch the status rows from `GET /api/status`.
    pub async fn fetch_status(&self, request_id: &str) -> Result<Vec<StatusRecord>, UpstreamError> {
        let start = Instant::now();
        let result = self.call_status(request_id).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        metrics::record_upstream(outcome, start);
        result
    }

    async fn call_status(&self, request_id: &str) -> Result<Vec<StatusRecord>, UpstreamError> {
        let settings = self.settings.load_full();
        let uri = resolve_endpoint(settings.api_host.as_deref(), STATUS_PATH)?;

        let mut builder = Request::builder()
            .method("GET")
            .uri(uri.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, "tiered-web");
        if let Ok(value) = HeaderValue::from_str(request_id) {
            builder = builder.header(X_REQUEST_ID, value);
        }
        let request = builder
            .body(Body::empty())
            .map_err(|e| UpstreamError::InvalidAddress {
                address: uri.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(request_id = %request_id, uri = %uri, "Calling API service");

        let deadline = settings.deadline;
        with_deadline("api status call", deadline, async {
            let response: hyper::Response<hyper::body::Incoming> = self
                .client
                .request(request)
                .await
                .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(UpstreamError::Status(status.as_u16()));
            }

            let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_BODY_BYTES)
                .await
                .map_err(|e| UpstreamError::Decode(e.to_string()))?;

            serde_json::from_slice::<Vec<StatusRecord>>(&bytes)
                .map_err(|e| UpstreamError::Decode(e.to_string()))
        })
        .await
        .map_err(|_| UpstreamError::Timeout(deadline))?
    }
}
