//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to ApiServer / WebServer at construction
//!
//! On file change (web service):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → sent over an mpsc channel to the running WebServer
//!     → upstream settings swapped atomically
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so both services start with no file at all
//! - The environment wins over the file (PORT, API_HOST, DATABASE_URL, DB*)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load, load_config, ConfigError};
pub use schema::{
    ApiConfig, AppConfig, DatabaseConfig, ObservabilityConfig, ServiceKind, TimeoutConfig,
    WebConfig,
};
