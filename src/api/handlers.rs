//! API service handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::ApiState;
use crate::http::HandlerError;
use crate::observability::metrics;
use crate::resilience::with_deadline;
use crate::routing::RoutedRequest;

/// Label used for the database in errors and logs.
const UPSTREAM: &str = "database";

/// `GET /api/status`: the database clock, as a JSON array of rows.
///
/// The query runs under `state.query_deadline`; an unreachable or slow
/// database yields 500 with a JSON `message` instead of a hung request.
pub async fn status(state: ApiState, request: RoutedRequest) -> Response {
    let request_id = request.request_id().to_owned();
    let store = state.store.name();

    let result = with_deadline("status query", state.query_deadline, state.store.current_status()).await;

    let err = match result {
        Ok(Ok(rows)) => {
            metrics::record_db_query(store, "ok");
            tracing::debug!(request_id = %request_id, rows = rows.len(), "Status query succeeded");
            return (StatusCode::OK, Json(rows)).into_response();
        }
        Ok(Err(e)) => {
            metrics::record_db_query(store, "error");
            HandlerError::UpstreamUnavailable {
                upstream: UPSTREAM,
                detail: e.to_string(),
            }
        }
        Err(elapsed) => {
            metrics::record_db_query(store, "timeout");
            HandlerError::UpstreamUnavailable {
                upstream: UPSTREAM,
                detail: elapsed.to_string(),
            }
        }
    };

    err.log(&request_id);
    err.into_response()
}

/// Catch-all: 404 with a JSON `message`.
pub async fn not_found(_state: ApiState, request: RoutedRequest) -> Response {
    let err = HandlerError::RouteNotFound {
        method: request.method().clone(),
        path: request.path().to_string(),
    };
    err.log(request.request_id());
    err.into_response()
}
