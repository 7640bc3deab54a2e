//! Request identification.
//!
//! # Responsibilities
//! - Assign a unique request ID (UUID v4) to every inbound request
//! - Keep a client-supplied `x-request-id` instead of replacing it
//! - Echo the ID on the response and expose it to handlers
//!
//! # Design Decisions
//! - Request ID added as the outermost layer so trace spans see it
//! - The web service forwards it on its call to the API service

use axum::http::Request;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// ID reported when a request somehow bypassed the request-id layer.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// Read the request ID assigned by [`set_request_id_layer`].
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN_REQUEST_ID)
}

/// Layer that assigns `x-request-id` when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies `x-request-id` from the request onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
