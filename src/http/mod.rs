//! HTTP plumbing shared by the API and web services.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign / propagate request ID)
//!     → routing::RouteTable (first match or fallback)
//!     → handler → Response, or HandlerError (error.rs)
//!     → response.rs (JSON error payload)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::HandlerError;
pub use request::{request_id, X_REQUEST_ID};
pub use response::{json_error, ErrorPayload};
pub use server::{build_router, serve, ServerError};
