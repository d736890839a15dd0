//! Prometheus Metrics Registry - Service Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers API traffic, storage-tier fallbacks, cache effectiveness and
//! the extraction results users record.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument};

/// Centralized Prometheus metrics for the tracker service.
///
/// All metrics follow the naming convention `freebet_tracker_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// API requests by endpoint.
    pub http_requests: IntCounterVec,
    /// Storage operations that fell back to the local tier, by operation.
    pub storage_fallbacks: IntCounterVec,
    /// Ledger read-cache lookups by result (hit/miss).
    pub cache_lookups: IntCounterVec,
    /// Hedge quotes served.
    pub quotes_served: IntCounter,
    /// Freebets recorded in the ledger.
    pub freebets_recorded: IntCounter,
    /// Extraction percentages of recorded outcomes.
    pub extraction_percent: Histogram,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new(
                "freebet_tracker_http_requests_total",
                "API requests by endpoint",
            ),
            &["endpoint"],
        )?;

        let storage_fallbacks = IntCounterVec::new(
            Opts::new(
                "freebet_tracker_storage_fallbacks_total",
                "Operations served by the local tier after a remote failure",
            ),
            &["operation"],
        )?;

        let cache_lookups = IntCounterVec::new(
            Opts::new(
                "freebet_tracker_cache_lookups_total",
                "Ledger cache lookups by result",
            ),
            &["result"],
        )?;

        let quotes_served = IntCounter::new(
            "freebet_tracker_quotes_served_total",
            "Hedge quotes computed for callers",
        )?;

        let freebets_recorded = IntCounter::new(
            "freebet_tracker_freebets_recorded_total",
            "Freebets added to the ledger",
        )?;

        let extraction_percent = Histogram::with_opts(
            HistogramOpts::new(
                "freebet_tracker_extraction_percent",
                "Extraction percentage of recorded outcomes",
            )
            .buckets(vec![0.0, 25.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]),
        )?;

        // Register all metrics
        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(storage_fallbacks.clone()))?;
        registry.register(Box::new(cache_lookups.clone()))?;
        registry.register(Box::new(quotes_served.clone()))?;
        registry.register(Box::new(freebets_recorded.clone()))?;
        registry.register(Box::new(extraction_percent.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            storage_fallbacks,
            cache_lookups,
            quotes_served,
            freebets_recorded,
            extraction_percent,
        })
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let registry = metrics_self.registry.clone();
                async move {
                    let encoder = TextEncoder::new();
                    let metric_families = registry.gather();
                    let mut buffer = Vec::new();
                    if encoder.encode(&metric_families, &mut buffer).is_err() {
                        return String::new();
                    }
                    String::from_utf8(buffer).unwrap_or_default()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds_and_counts() {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.quotes_served.inc();
        metrics.http_requests.with_label_values(&["quote"]).inc();
        metrics
            .storage_fallbacks
            .with_label_values(&["list"])
            .inc();
        assert_eq!(metrics.quotes_served.get(), 1);
    }
}
