//! Inbound HTTP Adapter - JSON API Server
//!
//! Serves the calculator, ledger CRUD and monthly statistics over axum 0.7
//! with graceful shutdown wired to the service-wide broadcast channel.

pub mod routes;

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, instrument};

pub use routes::{ApiError, ApiState, Ledger, Reporter, build_router};

/// Axum-based JSON API server.
pub struct ApiServer {
    state: Arc<ApiState>,
    bind_address: String,
}

impl ApiServer {
    pub fn new(state: Arc<ApiState>, bind_address: String) -> Self {
        Self {
            state,
            bind_address,
        }
    }

    /// Serve the API until shutdown is signalled.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(
        self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let app = build_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
        info!(address = %self.bind_address, "API server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
