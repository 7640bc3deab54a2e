//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dependency call (database query, API call):
//!     → timeouts.rs (enforce deadline)
//!     → On timeout: DeadlineExceeded, mapped to an error response
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Failures surface immediately; there is no retry layer

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};
