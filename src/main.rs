//! Freebet Tracker — Entry Point
//!
//! Initializes configuration, logging, the two-tier ledger store and the
//! HTTP servers. Runs until SIGINT/SIGTERM.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Build local tier (atomic JSON ledger + stats JSONL)
//! 4. Build remote tier (retrying REST client) when enabled
//! 5. Compose tiered store (TTL cache + fallback) and usecases
//! 6. Spawn health server (/live + /ready) and Prometheus exporter
//! 7. Spawn the JSON API server
//! 8. Wait for SIGINT → graceful shutdown (drain→stop→exit)

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use freebet_tracker::adapters::api::{RemoteFreebetStore, RestClient, RestClientConfig};
use freebet_tracker::adapters::http::{ApiServer, ApiState};
use freebet_tracker::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use freebet_tracker::adapters::persistence::{LocalFreebetStore, StatsLog};
use freebet_tracker::adapters::tiered::TieredFreebetStore;
use freebet_tracker::config;
use freebet_tracker::domain::extraction::ExtractionCalculator;
use freebet_tracker::ports::clock::{Clock, SystemClock};
use freebet_tracker::usecases::{FreebetLedger, StatsReporter};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.app.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        remote = config.remote.enabled,
        data_dir = %config.persistence.data_dir,
        "Starting freebet tracker"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let metrics =
        Arc::new(MetricsRegistry::new().context("Failed to build metrics registry")?);

    // ── 4. Local tier: atomic JSON ledger + stats JSONL ─────
    let local = Arc::new(
        LocalFreebetStore::new(&config.persistence.data_dir)
            .await
            .context("Failed to open local ledger store")?,
    );
    let stats_log = Arc::new(
        StatsLog::new(&config.persistence.data_dir)
            .await
            .context("Failed to open stats log")?,
    );

    // ── 5. Remote tier (optional) ───────────────────────────
    let remote: Option<Arc<RemoteFreebetStore>> = if config.remote.enabled {
        let client = RestClient::new(RestClientConfig {
            base_url: config.remote.base_url.clone(),
            api_key: config.remote.api_key.clone(),
            timeout: Duration::from_millis(config.remote.timeout_ms),
            max_concurrent: 4,
            max_retries: config.remote.max_retries,
            retry_base_delay: Duration::from_millis(200),
        })
        .context("Failed to create remote store client")?;
        Some(Arc::new(RemoteFreebetStore::new(
            client,
            config.remote.user_id.clone(),
        )))
    } else {
        None
    };

    // ── 6. Tiered store + usecases ──────────────────────────
    let store = Arc::new(TieredFreebetStore::new(
        remote,
        Arc::clone(&local),
        config.cache.ttl_seconds,
        Arc::clone(&clock),
        Arc::clone(&metrics),
    ));
    let ledger = Arc::new(FreebetLedger::new(Arc::clone(&store), Arc::clone(&clock)));
    let stats = Arc::new(StatsReporter::new(
        Arc::clone(&store),
        stats_log,
        Arc::clone(&clock),
    ));

    // ── 7. Health server on the probe port ──────────────────
    let health = Arc::new(HealthState::new());
    let health_server = HealthServer::new(Arc::clone(&health), config.server.health_port);
    let health_shutdown = shutdown_tx.subscribe();
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.run(health_shutdown).await {
            error!(error = %e, "Health server failed");
        }
    });

    // ── 8. Prometheus exporter ──────────────────────────────
    let metrics_handle = if config.server.metrics_enabled {
        let exporter = Arc::clone(&metrics);
        let addr = config.server.metrics_bind_address.clone();
        let metrics_shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = exporter.serve(addr, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        }))
    } else {
        None
    };

    // ── 9. JSON API server ──────────────────────────────────
    let api_state = Arc::new(ApiState {
        ledger,
        stats,
        calculator: ExtractionCalculator::new(),
        default_commission_percent: config.calculator.default_commission_percent,
        metrics: Arc::clone(&metrics),
        health: Arc::clone(&health),
    });
    let api_server = ApiServer::new(api_state, config.server.bind_address.clone());
    let api_shutdown = shutdown_tx.subscribe();
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api_server.run(api_shutdown).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 10. Periodic storage health refresh ─────────────────
    let probe_store = Arc::clone(&store);
    let probe_health = Arc::clone(&health);
    let mut probe_shutdown = shutdown_tx.subscribe();
    let probe_handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = probe_shutdown.recv() => break,
                _ = tokio::time::sleep(Duration::from_secs(30)) => {
                    let tiers = probe_store.health().await;
                    probe_health.local_healthy.store(tiers.local, Ordering::Relaxed);
                    if let Some(remote_ok) = tiers.remote {
                        probe_health.remote_healthy.store(remote_ok, Ordering::Relaxed);
                        if !remote_ok {
                            warn!("Remote tier unreachable, serving from local fallback");
                        }
                    }
                    if !tiers.local {
                        warn!("Local tier unwritable — readiness probe will fail");
                    }
                }
            }
        }
    });

    info!("All tasks spawned — tracker is running");

    // ── 11. Wait for SIGINT ─────────────────────────────────
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
    }

    // ── Graceful shutdown (drain→stop→exit) ─────────────────

    // 1. Readiness probe drains traffic first
    health.serving.store(false, Ordering::Relaxed);

    // 2. Signal all tasks to stop
    let _ = shutdown_tx.send(());
    info!("Shutdown signal broadcast to all tasks");

    // 3. Wait for servers to finish (bounded)
    let _ = tokio::time::timeout(Duration::from_secs(10), api_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), health_handle).await;
    if let Some(handle) = metrics_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    let _ = tokio::time::timeout(Duration::from_secs(5), probe_handle).await;

    info!("Shutdown complete");
    Ok(())
}
