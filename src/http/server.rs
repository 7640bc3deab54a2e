//! HTTP server setup shared by both services.
//!
//! # Responsibilities
//! - Mount a [`RouteTable`] behind a single Axum catch-all handler
//! - Wire up middleware (request ID, tracing, panic guard)
//! - Bound every request by the request timeout, answering 500 with a
//!   JSON `message` when it fires
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::TimeoutConfig;
use crate::db::StoreError;
use crate::http::error::HandlerError;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::panic_response;
use crate::resilience::with_deadline;
use crate::routing::{PatternError, RouteTable};

/// Errors constructing a service.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route: {0}")]
    Route(#[from] PatternError),

    #[error("database setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("view engine '{0}' is not registered")]
    UnknownViewEngine(String),
}

/// Axum state: the route table plus the service state handed to handlers.
struct Dispatcher<S> {
    table: Arc<RouteTable<S>>,
    state: S,
    request_timeout: Duration,
}

impl<S: Clone> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            state: self.state.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

/// Build the Axum router with all middleware layers.
///
/// Axum only provides the transport; every path, including `/`, reaches
/// `table`, which alone decides which handler runs.
pub fn build_router<S>(table: Arc<RouteTable<S>>, state: S, timeouts: &TimeoutConfig) -> Router
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", any(dispatch::<S>))
        .route("/{*path}", any(dispatch::<S>))
        .with_state(Dispatcher {
            table,
            state,
            request_timeout: timeouts.request(),
        })
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}

async fn dispatch<S>(State(dispatcher): State<Dispatcher<S>>, request: Request<Body>) -> Response
where
    S: Clone + Send + Sync + 'static,
{
    let id = request_id(&request).to_owned();
    let after = dispatcher.request_timeout;

    match with_deadline("request", after, dispatcher.table.dispatch(dispatcher.state, request)).await {
        Ok(response) => response,
        Err(_) => {
            let err = HandlerError::RequestTimeout { after };
            err.log(&id);
            err.into_response()
        }
    }
}

/// Serve `router` on `listener` until `shutdown` fires.
///
/// In-flight requests are drained; the listener is closed on return.
pub async fn serve(
    service: &'static str,
    listener: TcpListener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(service, address = %addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!(service, "Shutdown signal received, draining connections");
        })
        .await?;

    tracing::info!(service, "HTTP server stopped");
    Ok(())
}
