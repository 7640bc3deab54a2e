//! Web service handlers.

use axum::response::{Html, IntoResponse, Response};

use crate::http::HandlerError;
use crate::routing::RoutedRequest;
use crate::web::client::UpstreamError;
use crate::web::views::View;
use crate::web::WebState;

/// `GET /`: call the API service and render the index view.
///
/// Any upstream failure renders the error page with a 500 instead.
pub async fn index(state: WebState, request: RoutedRequest) -> Response {
    let request_id = request.request_id().to_owned();

    let row = state
        .client
        .fetch_status(&request_id)
        .await
        .and_then(|rows| rows.into_iter().next().ok_or(UpstreamError::Empty));

    match row {
        Ok(row) => {
            tracing::debug!(request_id = %request_id, time = %row.time, "Rendering index");
            Html(state.engine.render(&View::Index {
                title: &state.title,
                time: &row.time,
            }))
            .into_response()
        }
        Err(e) => render_error(&state, &request_id, e.into()),
    }
}

/// Catch-all for paths no route claims.
pub async fn not_found(state: WebState, request: RoutedRequest) -> Response {
    let err = HandlerError::RouteNotFound {
        method: request.method().clone(),
        path: request.path().to_string(),
    };
    render_error(&state, request.request_id(), err)
}

/// Render the error view for `err` with its status code.
pub fn render_error(state: &WebState, request_id: &str, err: HandlerError) -> Response {
    err.log(request_id);

    let status = err.status();
    let message = err.public_message();
    let page = state.engine.render(&View::Error {
        title: &state.title,
        status,
        message: &message,
    });

    (status, Html(page)).into_response()
}
