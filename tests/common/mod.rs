//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tiered_services::db::{StatusRecord, StatusStore, StoreError};
use tiered_services::{ApiServer, AppConfig, Shutdown, WebServer};

/// Start a programmable mock backend on an ephemeral port.
///
/// Every connection gets one response built by `f`; the connection is then
/// closed.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                // Drain the request head before answering.
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Mock API answering every request with `status` and `body`.
pub async fn start_mock_api(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend(move || async move { (status, body.to_string()) }).await
}

/// A status store that always returns one fixed row.
pub struct FixedStore(pub &'static str);

#[async_trait]
impl StatusStore for FixedStore {
    async fn current_status(&self) -> Result<Vec<StatusRecord>, StoreError> {
        Ok(vec![StatusRecord {
            time: self.0.to_string(),
        }])
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// A status store whose query never completes.
pub struct HangingStore;

#[async_trait]
impl StatusStore for HangingStore {
    async fn current_status(&self) -> Result<Vec<StatusRecord>, StoreError> {
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "hanging"
    }
}

/// Config with short deadlines and quiet logging.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.timeouts.db_query_ms = 500;
    config.timeouts.db_acquire_ms = 300;
    config.timeouts.upstream_ms = 800;
    config.timeouts.upstream_connect_ms = 300;
    config
}

/// Serve an API built around `store` on an ephemeral port.
pub async fn spawn_api(config: AppConfig, store: Arc<dyn StatusStore>) -> (SocketAddr, Shutdown) {
    let server = ApiServer::new(config, store).unwrap();
    serve_api(server).await
}

pub async fn serve_api(server: ApiServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    (addr, shutdown)
}

/// A running web service plus the handle feeding it config updates.
pub struct WebHandle {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<AppConfig>,
}

impl WebHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Serve a web front end on an ephemeral port.
pub async fn spawn_web(config: AppConfig) -> WebHandle {
    let server = WebServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let (updates, updates_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    WebHandle {
        addr,
        shutdown,
        updates,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
