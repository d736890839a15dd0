//! Tiered Freebet Store - Remote-first Storage with Local Fallback
//!
//! Composes the remote REST store and the local file store into one
//! best-effort ledger: reads serve from a TTL cache when fresh, otherwise
//! remote-first with local fallback; writes go remote-first and fall back
//! to local on error; deletes prune BOTH tiers. Every result reports which
//! tier served it, and every mutation invalidates the read cache.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::cache::TtlCache;
use super::metrics::MetricsRegistry;
use crate::domain::freebet::Freebet;
use crate::ports::clock::Clock;
use crate::ports::repository::{FreebetStore, StorageTier, Stored};

/// Per-tier health snapshot for readiness reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierHealth {
    /// None when no remote tier is configured.
    pub remote: Option<bool>,
    pub local: bool,
}

/// Two-tier ledger store with a TTL read cache.
pub struct TieredFreebetStore<R: FreebetStore, L: FreebetStore> {
    remote: Option<Arc<R>>,
    local: Arc<L>,
    cache: TtlCache<Stored<Vec<Freebet>>>,
    metrics: Arc<MetricsRegistry>,
}

impl<R: FreebetStore, L: FreebetStore> TieredFreebetStore<R, L> {
    pub fn new(
        remote: Option<Arc<R>>,
        local: Arc<L>,
        cache_ttl_seconds: u64,
        clock: Arc<dyn Clock>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            remote,
            local,
            cache: TtlCache::new(cache_ttl_seconds, clock),
            metrics,
        }
    }

    /// List the ledger, serving from cache when fresh.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Stored<Vec<Freebet>>> {
        if let Some(cached) = self.cache.get().await {
            self.metrics.cache_lookups.with_label_values(&["hit"]).inc();
            return Ok(cached);
        }
        self.metrics
            .cache_lookups
            .with_label_values(&["miss"])
            .inc();

        let listed = match &self.remote {
            Some(remote) => match remote.list().await {
                Ok(freebets) => Stored::new(freebets, StorageTier::Remote),
                Err(e) => {
                    self.note_fallback("list", &e);
                    let freebets =
                        self.local.list().await.context("Local tier list failed")?;
                    Stored::new(freebets, StorageTier::Local)
                }
            },
            None => {
                let freebets = self.local.list().await?;
                Stored::new(freebets, StorageTier::Local)
            }
        };

        self.cache.set(listed.clone()).await;
        Ok(listed)
    }

    /// Persist a new record, reporting the tier that accepted it.
    #[instrument(skip(self, freebet), fields(id = %freebet.id))]
    pub async fn insert(&self, freebet: &Freebet) -> Result<StorageTier> {
        let tier = match &self.remote {
            Some(remote) => match remote.insert(freebet).await {
                Ok(()) => StorageTier::Remote,
                Err(e) => {
                    self.note_fallback("insert", &e);
                    self.local
                        .insert(freebet)
                        .await
                        .context("Local tier insert failed")?;
                    StorageTier::Local
                }
            },
            None => {
                self.local.insert(freebet).await?;
                StorageTier::Local
            }
        };

        self.cache.invalidate().await;
        Ok(tier)
    }

    /// Replace an existing record. The boolean reports whether the serving
    /// tier knew the ID.
    #[instrument(skip(self, freebet), fields(id = %freebet.id))]
    pub async fn update(&self, freebet: &Freebet) -> Result<Stored<bool>> {
        let outcome = match &self.remote {
            Some(remote) => match remote.update(freebet).await {
                Ok(found) => Stored::new(found, StorageTier::Remote),
                Err(e) => {
                    self.note_fallback("update", &e);
                    let found = self
                        .local
                        .update(freebet)
                        .await
                        .context("Local tier update failed")?;
                    Stored::new(found, StorageTier::Local)
                }
            },
            None => Stored::new(self.local.update(freebet).await?, StorageTier::Local),
        };

        self.cache.invalidate().await;
        Ok(outcome)
    }

    /// Remove a record from BOTH tiers.
    ///
    /// The local tier is pruned even when the remote delete succeeded, so a
    /// record fallback-inserted locally can never resurrect. The boolean is
    /// true when either tier held the record.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<Stored<bool>> {
        let mut tier = StorageTier::Local;
        let mut removed = false;
        let mut remote_error = None;

        if let Some(remote) = &self.remote {
            match remote.delete(id).await {
                Ok(found) => {
                    removed = found;
                    tier = StorageTier::Remote;
                }
                Err(e) => {
                    self.note_fallback("delete", &e);
                    remote_error = Some(e);
                }
            }
        }

        match self.local.delete(id).await {
            Ok(found) => removed = removed || found,
            Err(e) => {
                // Only fatal when the remote tier didn't answer either.
                if remote_error.is_some() || self.remote.is_none() {
                    return Err(e.context("Both storage tiers failed to delete"));
                }
                warn!(error = %e, "Local tier delete failed after remote success");
            }
        }

        self.cache.invalidate().await;
        Ok(Stored::new(removed, tier))
    }

    /// Probe both tiers.
    pub async fn health(&self) -> TierHealth {
        let remote = match &self.remote {
            Some(remote) => Some(remote.is_healthy().await),
            None => None,
        };
        TierHealth {
            remote,
            local: self.local.is_healthy().await,
        }
    }

    fn note_fallback(&self, operation: &str, error: &anyhow::Error) {
        warn!(
            operation,
            error = %error,
            "Remote tier failed, falling back to local store"
        );
        self.metrics
            .storage_fallbacks
            .with_label_values(&[operation])
            .inc();
    }
}
