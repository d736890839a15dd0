//! Local Freebet Store - Atomic JSON Ledger File
//!
//! Fallback tier of the two-tier ledger. The whole ledger lives in
//! `freebets.json`; every mutation rewrites it via a temporary file and an
//! atomic rename, so the file is always either the old or the new version,
//! never a partial write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::freebet::Freebet;
use crate::ports::repository::FreebetStore;

/// File-backed freebet store with atomic writes.
pub struct LocalFreebetStore {
    /// Path to freebets.json.
    ledger_path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl LocalFreebetStore {
    /// Create a new store in the given data directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(data_dir: &str) -> Result<Self> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)
            .await
            .context("Failed to create data directory")?;

        Ok(Self {
            ledger_path: dir.join("freebets.json"),
            tmp_path: dir.join("freebets.json.tmp"),
            write_lock: Mutex::new(()),
        })
    }

    async fn load(&self) -> Result<Vec<Freebet>> {
        if !self.ledger_path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.ledger_path)
            .await
            .context("Failed to read ledger file")?;

        serde_json::from_str(&json).context("Failed to parse ledger JSON")
    }

    /// Write the full ledger atomically (tmp → rename).
    async fn save(&self, freebets: &[Freebet]) -> Result<()> {
        let json = serde_json::to_string_pretty(freebets)
            .context("Failed to serialize ledger")?;

        fs::write(&self.tmp_path, &json)
            .await
            .context("Failed to write tmp ledger file")?;

        fs::rename(&self.tmp_path, &self.ledger_path)
            .await
            .context("Failed to rename ledger file")?;

        Ok(())
    }
}

#[async_trait]
impl FreebetStore for LocalFreebetStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Freebet>> {
        let mut freebets = self.load().await?;
        freebets.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(freebets)
    }

    #[instrument(skip(self, freebet), fields(id = %freebet.id))]
    async fn insert(&self, freebet: &Freebet) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut freebets = self.load().await?;
        freebets.push(freebet.clone());
        self.save(&freebets).await?;
        info!(path = %self.ledger_path.display(), "Freebet saved locally");
        Ok(())
    }

    #[instrument(skip(self, freebet), fields(id = %freebet.id))]
    async fn update(&self, freebet: &Freebet) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut freebets = self.load().await?;
        let Some(slot) = freebets.iter_mut().find(|fb| fb.id == freebet.id) else {
            return Ok(false);
        };
        *slot = freebet.clone();
        self.save(&freebets).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut freebets = self.load().await?;
        let before = freebets.len();
        freebets.retain(|fb| fb.id != id);
        if freebets.len() == before {
            return Ok(false);
        }
        self.save(&freebets).await?;
        Ok(true)
    }

    /// Check that the data directory is writable.
    async fn is_healthy(&self) -> bool {
        let probe = self.ledger_path.with_file_name(".health_check");
        let result = fs::write(&probe, b"ok").await;
        let _ = fs::remove_file(&probe).await;
        result.is_ok()
    }
}
