//! Repository Ports - Ledger Persistence Interfaces
//!
//! Defines the traits the usecases layer requires for storing freebets
//! and archived monthly statistics, plus the tier-reporting result types
//! for the two-tier (remote-first, local-fallback) storage composite.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::freebet::Freebet;
use crate::domain::stats::MonthlyStats;

/// Which storage tier served an operation.
///
/// Surfaced to callers so a degraded (local-only) write is visible instead
/// of silently swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageTier {
  /// Remote HTTP store answered.
  Remote,
  /// Local file store answered (fallback or remote disabled).
  Local,
}

impl std::fmt::Display for StorageTier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Remote => write!(f, "remote"),
      Self::Local => write!(f, "local"),
    }
  }
}

/// A value together with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
  pub value: T,
  pub tier: StorageTier,
}

impl<T> Stored<T> {
  pub fn new(value: T, tier: StorageTier) -> Self {
    Self { value, tier }
  }
}

/// Trait for a single freebet storage tier.
///
/// Both the remote REST adapter and the local JSON-file adapter implement
/// this; the tiered composite owns fallback and caching on top of it.
#[async_trait]
pub trait FreebetStore: Send + Sync + 'static {
  /// Load every freebet, newest recorded first.
  async fn list(&self) -> anyhow::Result<Vec<Freebet>>;

  /// Persist a fully-formed new freebet record.
  async fn insert(&self, freebet: &Freebet) -> anyhow::Result<()>;

  /// Replace the record with the same ID. Returns false if absent.
  async fn update(&self, freebet: &Freebet) -> anyhow::Result<bool>;

  /// Remove the record with this ID. Returns false if absent.
  async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

  /// Check if the tier can currently serve requests.
  async fn is_healthy(&self) -> bool;
}

/// Trait for the monthly statistics archive.
///
/// Stats are keyed by (year, month); upserting the same month replaces the
/// previous snapshot on load.
#[async_trait]
pub trait StatsArchive: Send + Sync + 'static {
  /// Record (or replace) the snapshot for one month.
  async fn upsert(&self, stats: &MonthlyStats) -> anyhow::Result<()>;

  /// Load all archived months, oldest first, one entry per month.
  async fn load_all(&self) -> anyhow::Result<Vec<MonthlyStats>>;
}
