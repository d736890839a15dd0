//! Stats Reporter Use Case - Real-time Aggregation and Archival
//!
//! Computes monthly statistics from the live ledger and mirrors each
//! month into the persistent archive, so history survives ledger edits.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::adapters::tiered::TieredFreebetStore;
use crate::domain::stats::{MonthlyStats, monthly_breakdown};
use crate::ports::clock::Clock;
use crate::ports::repository::{FreebetStore, StatsArchive};

/// Application service for monthly statistics.
pub struct StatsReporter<R: FreebetStore, L: FreebetStore, A: StatsArchive> {
  store: Arc<TieredFreebetStore<R, L>>,
  archive: Arc<A>,
  clock: Arc<dyn Clock>,
}

impl<R: FreebetStore, L: FreebetStore, A: StatsArchive> StatsReporter<R, L, A> {
  pub fn new(
    store: Arc<TieredFreebetStore<R, L>>,
    archive: Arc<A>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self {
      store,
      archive,
      clock,
    }
  }

  /// Compute per-month statistics from the current ledger.
  pub async fn current(&self) -> Result<Vec<MonthlyStats>> {
    let listed = self.store.list().await?;
    Ok(monthly_breakdown(&listed.value, self.clock.now()))
  }

  /// Compute current statistics and upsert every month into the archive.
  pub async fn archive_current(&self) -> Result<Vec<MonthlyStats>> {
    let stats = self.current().await?;
    for month in &stats {
      self.archive.upsert(month).await?;
    }
    info!(months = stats.len(), "Monthly statistics archived");
    Ok(stats)
  }

  /// Load the archived history, one entry per month.
  pub async fn history(&self) -> Result<Vec<MonthlyStats>> {
    self.archive.load_all().await
  }
}
