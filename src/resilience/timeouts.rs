//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap dependency calls (status query, API call) with a deadline
//! - Cancel the wrapped future cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from the dependency's own errors
//! - No retries: a missed deadline is reported immediately

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A dependency call did not finish within its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} timed out after {}ms", .after.as_millis())]
pub struct DeadlineExceeded {
    pub operation: &'static str,
    pub after: Duration,
}

/// Run `future`, giving up after `deadline`.
///
/// The future is dropped on timeout, abandoning whatever it was waiting on.
pub async fn with_deadline<F>(
    operation: &'static str,
    deadline: Duration,
    future: F,
) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    match tokio::time::timeout(deadline, future).await {
        Ok(output) => Ok(output),
        Err(_) => {
            tracing::warn!(operation, deadline_ms = deadline.as_millis() as u64, "Deadline exceeded");
            Err(DeadlineExceeded {
                operation,
                after: deadline,
            })
        }
    }
}
