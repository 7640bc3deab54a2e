//! Two-tier web services.
//!
//! One binary, two services: `tiered api` runs the JSON API, `tiered web`
//! runs the server-rendered front end.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────┐          ┌──────────────────────┐
//!   Browser           │     WEB SERVICE      │  HTTP    │     API SERVICE      │
//!   ─────────────────▶│  routes: GET /       │─────────▶│ routes: GET          │
//!                     │  fallback: 404 page  │ API_HOST │   /api/status        │
//!                     │                      │          │ fallback: 404 JSON   │
//!   ◀─────────────────│  views (maud)        │◀─────────│                      │
//!   200 page | 5xx    └──────────────────────┘          └──────────┬───────────┘
//!                                                                  │ SELECT now()
//!                                                                  ▼
//!                                                           ┌──────────────┐
//!                                                           │  PostgreSQL  │
//!                                                           └──────────────┘
//! ```
//!
//! Every dependency call carries a deadline; a dead database or API turns
//! into a 500 response, never a hung request or a crashed process.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tiered_services::config::{self, watcher::ConfigWatcher, ServiceKind};
use tiered_services::observability::{logging, metrics};
use tiered_services::{ApiServer, Shutdown, WebServer};

#[derive(Parser)]
#[command(name = "tiered")]
#[command(about = "Run the API or web service", long_about = None)]
struct Cli {
    /// TOML config file. Environment variables override its values.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    service: Service,
}

#[derive(Subcommand)]
enum Service {
    /// JSON API backed by PostgreSQL
    Api,
    /// Server-rendered front end calling the API
    Web {
        /// Reload upstream settings when the config file changes
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let kind = match cli.service {
        Service::Api => ServiceKind::Api,
        Service::Web { .. } => ServiceKind::Web,
    };

    let config = config::load(cli.config.as_deref(), kind)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(service = %kind, version = env!("CARGO_PKG_VERSION"), "Starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let listener = TcpListener::bind(config.bind_address(kind)).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    match cli.service {
        Service::Api => {
            let server = ApiServer::from_config(config)?;
            server.run(listener, shutdown.subscribe()).await?;
        }
        Service::Web { watch } => {
            let (_watcher, config_updates) = match (&cli.config, watch) {
                (Some(path), true) => {
                    let (watcher, updates) = ConfigWatcher::new(path, kind);
                    (Some(watcher.run()?), updates)
                }
                _ => {
                    if watch {
                        tracing::warn!("--watch needs --config; hot reload disabled");
                    }
                    let (_, updates) = mpsc::unbounded_channel();
                    (None, updates)
                }
            };

            let server = WebServer::new(config)?;
            tracing::info!(view_engine = server.view_engine(), "View engine registered");
            server.run(listener, config_updates, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
