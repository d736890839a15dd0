//! Remote Freebet Store - PostgREST Adapter
//!
//! Implements the `FreebetStore` port against a PostgREST-style endpoint
//! (`/rest/v1/freebets`). Rows are scoped to a single owner via a
//! `user_id` filter on every request; wire records use the remote table's
//! snake_case column names and convert to/from the domain entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::client::RestClient;
use crate::domain::freebet::Freebet;
use crate::ports::repository::FreebetStore;

const TABLE_PATH: &str = "/rest/v1/freebets";

/// One row of the remote `freebets` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FreebetRow {
  id: Uuid,
  user_id: String,
  bookmaker: String,
  face_value: f64,
  min_odds: f64,
  status: String,
  recorded_at: DateTime<Utc>,
  expires_at: Option<DateTime<Utc>>,
  used: bool,
  extracted: bool,
  extracted_value: Option<f64>,
}

impl FreebetRow {
  fn from_domain(freebet: &Freebet, user_id: &str) -> Self {
    Self {
      id: freebet.id,
      user_id: user_id.to_string(),
      bookmaker: freebet.bookmaker.clone(),
      face_value: freebet.face_value,
      min_odds: freebet.min_odds,
      status: freebet.status.clone(),
      recorded_at: freebet.recorded_at,
      expires_at: freebet.expires_at,
      used: freebet.used,
      extracted: freebet.extracted,
      extracted_value: freebet.extracted_value,
    }
  }

  fn into_domain(self) -> Freebet {
    Freebet {
      id: self.id,
      bookmaker: self.bookmaker,
      face_value: self.face_value,
      min_odds: self.min_odds,
      status: self.status,
      recorded_at: self.recorded_at,
      expires_at: self.expires_at,
      used: self.used,
      extracted: self.extracted,
      extracted_value: self.extracted_value,
    }
  }
}

/// Remote tier of the freebet ledger.
pub struct RemoteFreebetStore {
  client: RestClient,
  /// Row owner every request is filtered by.
  user_id: String,
}

impl RemoteFreebetStore {
  pub fn new(client: RestClient, user_id: impl Into<String>) -> Self {
    Self {
      client,
      user_id: user_id.into(),
    }
  }

  fn scoped(&self, extra: &str) -> String {
    format!("{TABLE_PATH}?user_id=eq.{}{extra}", self.user_id)
  }
}

#[async_trait]
impl FreebetStore for RemoteFreebetStore {
  #[instrument(skip(self))]
  async fn list(&self) -> anyhow::Result<Vec<Freebet>> {
    let path = self.scoped("&select=*&order=recorded_at.desc");
    let response = self.client.get(&path).await?;
    let rows: Vec<FreebetRow> = response.json().await?;
    Ok(rows.into_iter().map(FreebetRow::into_domain).collect())
  }

  #[instrument(skip(self, freebet), fields(id = %freebet.id))]
  async fn insert(&self, freebet: &Freebet) -> anyhow::Result<()> {
    let row = FreebetRow::from_domain(freebet, &self.user_id);
    let body = serde_json::to_string(&[row])?;
    self.client.post(TABLE_PATH, body).await?;
    Ok(())
  }

  #[instrument(skip(self, freebet), fields(id = %freebet.id))]
  async fn update(&self, freebet: &Freebet) -> anyhow::Result<bool> {
    let path = self.scoped(&format!("&id=eq.{}", freebet.id));
    let row = FreebetRow::from_domain(freebet, &self.user_id);
    let body = serde_json::to_string(&row)?;
    let response = self.client.patch(&path, body).await?;
    let updated: Vec<FreebetRow> = response.json().await.unwrap_or_default();
    Ok(!updated.is_empty())
  }

  #[instrument(skip(self))]
  async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
    let path = self.scoped(&format!("&id=eq.{id}"));
    let response = self.client.delete(&path).await?;
    let deleted: Vec<FreebetRow> = response.json().await.unwrap_or_default();
    Ok(!deleted.is_empty())
  }

  async fn is_healthy(&self) -> bool {
    // Cheap HEAD-equivalent: ask for zero rows.
    let path = self.scoped("&select=id&limit=1");
    self.client.health_check(&path).await
  }
}
