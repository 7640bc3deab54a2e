//! JSON error responses.
//!
//! Every non-2xx JSON response carries an [`ErrorPayload`] whose `message`
//! names the failure class. Internal error detail goes to the logs only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of a JSON error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl ErrorPayload {
    /// Build a payload, substituting the status' reason phrase for an
    /// empty message so `message` is never blank.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string()
        } else {
            message
        };
        Self { message }
    }
}

/// A JSON error response with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorPayload::new(status, message))).into_response()
}

/// Response used when a handler panics.
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_replaced() {
        let payload = ErrorPayload::new(StatusCode::NOT_FOUND, "  ");
        assert_eq!(payload.message, "Not Found");
    }

    #[tokio::test]
    async fn test_json_error_shape() {
        let response = json_error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: ErrorPayload = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload.message, "database unavailable");
    }
}
