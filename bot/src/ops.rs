//! Operational HTTP endpoints: health and Prometheus metrics.
//!
//! Bound on a loopback address by default; deployments that scrape metrics
//! remotely override the listen address in the config.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, TextEncoder};
use tokio::sync::broadcast;
use tracing::info;

use crate::error::BotError;
use crate::metrics::BotMetrics;

pub struct OpsServer {
    addr: SocketAddr,
    metrics: Arc<BotMetrics>,
}

impl OpsServer {
    pub fn new(addr: SocketAddr, metrics: Arc<BotMetrics>) -> Self {
        Self { addr, metrics }
    }

    /// Serve until the shutdown channel fires.
    pub async fn serve(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), BotError> {
        let app = Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics_text))
            .with_state(self.metrics);

        info!("ops server listening on {}", self.addr);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;
        Ok(())
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics_text(State(metrics): State<Arc<BotMetrics>>) -> Result<String, StatusCode> {
    let families = metrics.registry.gather();
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&families, &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
