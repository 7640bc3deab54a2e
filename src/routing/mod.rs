//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (method + path pattern, capture params)
//!     → matched route's handler, or the fallback handler
//!
//! Route registration (at service construction):
//!     builder.route(...)  in precedence order
//!     → builder.fallback(...)  freezes the table
//!     → shared via Arc, immutable at runtime
//! ```
//!
//! # Design Decisions
//! - Routes registered once, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod matcher;
pub mod router;

pub use matcher::{PathParams, PathPattern, PatternError};
pub use router::{Handler, RouteMatch, RouteTable, RouteTableBuilder, RoutedRequest, FALLBACK_ROUTE};
