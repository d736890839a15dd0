//! Stats Log - Append-only JSONL Monthly Statistics Archive
//!
//! Persists monthly statistics snapshots to `monthly_stats.jsonl`. Each
//! line is a self-contained JSON record; re-archiving a month appends a
//! new line and load keeps the latest line per (year, month), so the file
//! doubles as an audit trail of how the month's figures evolved.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{instrument, warn};

use crate::domain::stats::MonthlyStats;
use crate::ports::repository::StatsArchive;

/// JSONL-backed monthly statistics archive.
pub struct StatsLog {
    /// Path to monthly_stats.jsonl.
    log_path: PathBuf,
}

impl StatsLog {
    /// Create a new stats log in the given data directory.
    pub async fn new(data_dir: &str) -> Result<Self> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)
            .await
            .context("Failed to create data directory")?;

        Ok(Self {
            log_path: dir.join("monthly_stats.jsonl"),
        })
    }
}

#[async_trait]
impl StatsArchive for StatsLog {
    #[instrument(skip(self, stats), fields(year = stats.year, month = stats.month))]
    async fn upsert(&self, stats: &MonthlyStats) -> Result<()> {
        let mut json = serde_json::to_string(stats)
            .context("Failed to serialize monthly stats")?;
        json.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
            .context("Failed to open stats log file")?;

        file.write_all(json.as_bytes())
            .await
            .context("Failed to write stats record")?;

        file.flush().await.context("Failed to flush stats log")?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_all(&self) -> Result<Vec<MonthlyStats>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path).await?;
        let mut latest: BTreeMap<(i32, u32), MonthlyStats> = BTreeMap::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MonthlyStats>(line) {
                Ok(stats) => {
                    latest.insert((stats.year, stats.month), stats);
                }
                Err(e) => {
                    warn!(
                        file = %self.log_path.display(),
                        error = %e,
                        "Skipping malformed stats record"
                    );
                }
            }
        }

        Ok(latest.into_values().collect())
    }
}
