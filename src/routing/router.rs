//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Look up the first route matching a request
//! - Dispatch to exactly one handler: the matched route's or the fallback
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First registered, first matched: overlapping patterns are resolved by
//!   registration order only, never by specificity
//! - The fallback is set by the builder's terminal call, so it is always
//!   evaluated after every route

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::http::request::request_id;
use crate::observability::metrics;
use crate::routing::matcher::{method_matches, PathParams, PathPattern, PatternError};

/// Route name reported for requests served by the fallback handler.
pub const FALLBACK_ROUTE: &str = "fallback";

/// Future returned by a [`Handler`].
pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A unit of request handling bound to a route.
///
/// Implemented for any `Fn(S, RoutedRequest) -> impl Future<Output = Response>`,
/// so plain `async fn` handlers can be registered directly.
pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, state: S, request: RoutedRequest) -> ResponseFuture;
}

impl<S, F, Fut> Handler<S> for F
where
    F: Fn(S, RoutedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, state: S, request: RoutedRequest) -> ResponseFuture {
        Box::pin((self)(state, request))
    }
}

/// A request together with the outcome of routing it.
#[derive(Debug)]
pub struct RoutedRequest {
    pub request: Request<Body>,
    pub params: PathParams,
    /// Name of the matched route, or [`FALLBACK_ROUTE`].
    pub route: &'static str,
}

impl RoutedRequest {
    /// The request ID assigned by the request-id middleware.
    pub fn request_id(&self) -> &str {
        request_id(&self.request)
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn path(&self) -> &str {
        self.request.uri().path()
    }
}

struct Route<S> {
    name: &'static str,
    method: Method,
    pattern: PathPattern,
    handler: Box<dyn Handler<S>>,
}

/// Result of looking up a request in a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    Matched { route: &'static str, params: PathParams },
    NoMatch,
}

/// An ordered, immutable table of routes with a fallback handler.
pub struct RouteTable<S> {
    service: &'static str,
    routes: Vec<Route<S>>,
    fallback: Box<dyn Handler<S>>,
}

impl<S> std::fmt::Debug for RouteTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("service", &self.service)
            .field(
                "routes",
                &self
                    .routes
                    .iter()
                    .map(|r| format!("{} {} ({})", r.method, r.pattern, r.name))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<S: 'static> RouteTable<S> {
    /// Start building a table for `service` (used in logs and metrics).
    pub fn builder(service: &'static str) -> RouteTableBuilder<S> {
        RouteTableBuilder {
            service,
            routes: Vec::new(),
        }
    }

    /// Find the first route matching `method` and `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch {
        match self.find(method, path) {
            Some((route, params)) => RouteMatch::Matched {
                route: route.name,
                params,
            },
            None => RouteMatch::NoMatch,
        }
    }

    fn find(&self, method: &Method, path: &str) -> Option<(&Route<S>, PathParams)> {
        self.routes.iter().find_map(|route| {
            if !method_matches(&route.method, method) {
                return None;
            }
            route.pattern.capture(path).map(|params| (route, params))
        })
    }

    /// Number of registered routes, not counting the fallback.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Run the handler for `request` and return its response.
    ///
    /// Exactly one handler runs per call, and the response it returns is
    /// the only one produced for the request.
    pub async fn dispatch(&self, state: S, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();

        let (name, handler, params) = match self.find(&method, request.uri().path()) {
            Some((route, params)) => (route.name, &*route.handler, params),
            None => (FALLBACK_ROUTE, &*self.fallback, PathParams::default()),
        };

        tracing::debug!(
            service = self.service,
            request_id = %request_id(&request),
            method = %method,
            path = %request.uri().path(),
            route = name,
            "Dispatching request"
        );

        let response = handler
            .call(
                state,
                RoutedRequest {
                    request,
                    params,
                    route: name,
                },
            )
            .await;

        metrics::record_request(self.service, &method, name, response.status(), start);
        response
    }
}

/// Builder for [`RouteTable`]. Routes match in the order they are added.
pub struct RouteTableBuilder<S> {
    service: &'static str,
    routes: Vec<Route<S>>,
}

impl<S> RouteTableBuilder<S> {
    /// Append a route. Fails if `pattern` does not parse.
    pub fn route<H>(
        mut self,
        method: Method,
        pattern: &str,
        name: &'static str,
        handler: H,
    ) -> Result<Self, PatternError>
    where
        H: Handler<S>,
    {
        self.routes.push(Route {
            name,
            method,
            pattern: PathPattern::parse(pattern)?,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    /// Set the catch-all handler and freeze the table.
    pub fn fallback<H>(self, handler: H) -> RouteTable<S>
    where
        H: Handler<S>,
    {
        RouteTable {
            service: self.service,
            routes: self.routes,
            fallback: Box::new(handler),
        }
    }
}
