//! Configuration schema definitions.
//!
//! One file configures both services; each binary reads the sections it
//! needs. All types derive Serde traits for deserialization from TOML.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which of the two services a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// JSON API backed by the database.
    Api,
    /// Server-rendered front end calling the API.
    Web,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Api => "api",
            ServiceKind::Web => "web",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// API service settings.
    pub api: ApiConfig,

    /// Web service settings.
    pub web: WebConfig,

    /// Database connection used by the API service.
    pub database: DatabaseConfig,

    /// Deadlines for requests and dependency calls.
    pub timeouts: TimeoutConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Bind address of the given service.
    pub fn bind_address(&self, service: ServiceKind) -> &str {
        match service {
            ServiceKind::Api => &self.api.bind_address,
            ServiceKind::Web => &self.web.bind_address,
        }
    }
}

/// API service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Web service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Where the API service can be reached, e.g. "http://api:3000".
    /// Left unset, page renders fail with a server error instead of the
    /// process refusing to start.
    pub api_host: Option<String>,

    /// Name of the view engine rendering pages.
    pub view_engine: String,

    /// Page title shown by the index view.
    pub title: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            api_host: None,
            view_engine: "maud".to_string(),
            title: "3tier app".to_string(),
        }
    }
}

/// PostgreSQL connection settings.
///
/// `url` wins when set; otherwise the URL is assembled from the parts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Pool size.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL handed to the driver.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        if self.password.is_empty() {
            format!("postgres://{}@{}:{}/{}", self.user, self.host, self.port, self.name)
        } else {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            )
        }
    }
}

/// Timeout configuration.
///
/// Dependency deadlines are kept well below the request timeout so a slow
/// database or API surfaces as an error response rather than a cut connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,

    /// Deadline for the status query, including pool acquisition.
    pub db_query_ms: u64,

    /// Deadline for acquiring a pooled database connection.
    pub db_acquire_ms: u64,

    /// Deadline for the web service's call to the API service.
    pub upstream_ms: u64,

    /// TCP connect timeout for the call to the API service.
    pub upstream_connect_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            db_query_ms: 2_000,
            db_acquire_ms: 1_500,
            upstream_ms: 2_500,
            upstream_connect_ms: 1_000,
        }
    }
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn db_query(&self) -> Duration {
        Duration::from_millis(self.db_query_ms)
    }

    pub fn db_acquire(&self) -> Duration {
        Duration::from_millis(self.db_acquire_ms)
    }

    pub fn upstream(&self) -> Duration {
        Duration::from_millis(self.upstream_ms)
    }

    pub fn upstream_connect(&self) -> Duration {
        Duration::from_millis(self.upstream_connect_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
