//! Handler-boundary error taxonomy.
//!
//! Every failure a handler can meet is turned into one of these variants
//! and then into exactly one HTTP response. Nothing escapes as a crash.

use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::json_error;

/// Failure classes surfaced to clients.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No registered route matches.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// A dependency could not be reached or did not answer in time.
    #[error("{upstream} unavailable: {detail}")]
    UpstreamUnavailable { upstream: &'static str, detail: String },

    /// A dependency answered, but with a failure.
    #[error("{upstream} returned an error: {detail}")]
    UpstreamError { upstream: &'static str, detail: String },

    /// Required configuration is absent or unusable.
    #[error("{upstream} not configured: {detail}")]
    ConfigurationMissing { upstream: &'static str, detail: String },

    /// The whole request outlived the service's request timeout.
    #[error("request timed out after {}ms", .after.as_millis())]
    RequestTimeout { after: Duration },
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            HandlerError::UpstreamUnavailable { .. }
            | HandlerError::UpstreamError { .. }
            | HandlerError::ConfigurationMissing { .. }
            | HandlerError::RequestTimeout { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message: the failure class, never internal detail.
    pub fn public_message(&self) -> String {
        match self {
            HandlerError::RouteNotFound { .. } => "Not Found".to_string(),
            HandlerError::UpstreamUnavailable { upstream, .. } => {
                format!("{} unavailable", upstream)
            }
            HandlerError::UpstreamError { upstream, .. } => {
                format!("{} returned an error", upstream)
            }
            HandlerError::ConfigurationMissing { upstream, .. } => {
                format!("{} not configured", upstream)
            }
            HandlerError::RequestTimeout { .. } => "request timed out".to_string(),
        }
    }

    /// Log at a level matching the failure class.
    pub fn log(&self, request_id: &str) {
        match self {
            HandlerError::RouteNotFound { method, path } => {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "No route matched");
            }
            _ => {
                tracing::error!(request_id = %request_id, error = %self, "Request failed");
            }
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.public_message())
    }
}
