//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject view engines that are not registered
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - The API address is NOT validated here: a missing or bad `api_host`
//!   is a request-time failure of the web service, never a startup one

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::web::views;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("view engine '{0}' is not registered")]
    UnknownViewEngine(String),

    #[error("{field} ({deadline_ms}ms) must be shorter than the request timeout ({request_ms}ms)")]
    DeadlineNotBelowRequest {
        field: &'static str,
        deadline_ms: u64,
        request_ms: u64,
    },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "api.bind_address", &config.api.bind_address);
    check_address(&mut errors, "web.bind_address", &config.web.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if !views::is_registered(&config.web.view_engine) {
        errors.push(ValidationError::UnknownViewEngine(config.web.view_engine.clone()));
    }

    if config.database.max_connections == 0 {
        errors.push(ValidationError::Zero("database.max_connections"));
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.request_secs", timeouts.request_secs),
        ("timeouts.db_query_ms", timeouts.db_query_ms),
        ("timeouts.db_acquire_ms", timeouts.db_acquire_ms),
        ("timeouts.upstream_ms", timeouts.upstream_ms),
        ("timeouts.upstream_connect_ms", timeouts.upstream_connect_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    // Dependency deadlines must fire first so their errors, not the
    // request timeout, decide the response.
    let request_ms = timeouts.request_secs.saturating_mul(1000);
    if timeouts.request_secs > 0 {
        for (field, deadline_ms) in [
            ("timeouts.db_query_ms", timeouts.db_query_ms),
            ("timeouts.upstream_ms", timeouts.upstream_ms),
        ] {
            if deadline_ms >= request_ms {
                errors.push(ValidationError::DeadlineNotBelowRequest {
                    field,
                    deadline_ms,
                    request_ms,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
