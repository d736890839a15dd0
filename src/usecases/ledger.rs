//! Freebet Ledger Use Case - CRUD Orchestration over the Tiered Store
//!
//! Assigns IDs and timestamps to incoming drafts, routes every operation
//! through the tiered store, and records realized extraction outcomes
//! against existing entries.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use crate::adapters::tiered::TieredFreebetStore;
use crate::domain::freebet::{Freebet, FreebetDraft};
use crate::ports::clock::Clock;
use crate::ports::repository::{FreebetStore, Stored};

/// Application service for the freebet ledger.
pub struct FreebetLedger<R: FreebetStore, L: FreebetStore> {
  store: Arc<TieredFreebetStore<R, L>>,
  clock: Arc<dyn Clock>,
}

impl<R: FreebetStore, L: FreebetStore> FreebetLedger<R, L> {
  pub fn new(store: Arc<TieredFreebetStore<R, L>>, clock: Arc<dyn Clock>) -> Self {
    Self { store, clock }
  }

  /// Log a new freebet. The ledger assigns the ID and recorded date.
  pub async fn add(&self, draft: FreebetDraft) -> Result<Stored<Freebet>> {
    anyhow::ensure!(
      !draft.bookmaker.trim().is_empty(),
      "bookmaker must not be empty"
    );
    anyhow::ensure!(
      draft.face_value > 0.0,
      "face_value must be positive, got {}",
      draft.face_value
    );
    anyhow::ensure!(
      draft.min_odds >= 1.0,
      "min_odds must be at least 1, got {}",
      draft.min_odds
    );

    let freebet = Freebet::from_draft(draft, Uuid::new_v4(), self.clock.now());
    let tier = self.store.insert(&freebet).await?;

    info!(
      id = %freebet.id,
      bookmaker = %freebet.bookmaker,
      face_value = freebet.face_value,
      tier = %tier,
      "Freebet logged"
    );

    Ok(Stored::new(freebet, tier))
  }

  /// List the full ledger, newest first.
  pub async fn list(&self) -> Result<Stored<Vec<Freebet>>> {
    self.store.list().await
  }

  /// Find one entry by ID.
  pub async fn get(&self, id: Uuid) -> Result<Option<Freebet>> {
    let listed = self.store.list().await?;
    Ok(listed.value.into_iter().find(|fb| fb.id == id))
  }

  /// Replace an entry. Returns None when no tier knows the ID.
  pub async fn update(&self, freebet: Freebet) -> Result<Option<Stored<Freebet>>> {
    let outcome = self.store.update(&freebet).await?;
    if outcome.value {
      Ok(Some(Stored::new(freebet, outcome.tier)))
    } else {
      Ok(None)
    }
  }

  /// Remove an entry. Returns the tier that answered and whether any tier
  /// held the record.
  pub async fn delete(&self, id: Uuid) -> Result<Stored<bool>> {
    self.store.delete(id).await
  }

  /// Record a settled hedge against an existing entry.
  ///
  /// The realized profit usually comes from an `ExtractionQuote`, but the
  /// user may correct it to whatever the exchange actually paid.
  pub async fn record_extraction(
    &self,
    id: Uuid,
    realized_profit: f64,
  ) -> Result<Option<Stored<Freebet>>> {
    anyhow::ensure!(
      realized_profit.is_finite(),
      "realized_profit must be a finite amount"
    );

    let Some(mut freebet) = self.get(id).await? else {
      return Ok(None);
    };

    freebet.mark_extracted(realized_profit);
    let outcome = self.store.update(&freebet).await?;
    if !outcome.value {
      return Ok(None);
    }

    info!(
      id = %freebet.id,
      realized_profit,
      tier = %outcome.tier,
      "Extraction outcome recorded"
    );

    Ok(Some(Stored::new(freebet, outcome.tier)))
  }
}
