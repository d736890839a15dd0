//! Monthly statistics aggregation.
//!
//! Groups the freebet ledger by calendar month of the recorded date and
//! reduces each group to counters and money totals. Pure functions over a
//! slice; "now" is an argument so expiry counting is deterministic in tests.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::extraction::round2;
use super::freebet::Freebet;

/// Aggregated figures for one calendar month of ledger activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    /// Freebets settled with cash extracted.
    pub extracted: u32,
    /// Freebets placed but never extracted.
    pub lost: u32,
    /// Freebets whose promotion deadline passed.
    pub expired: u32,
    /// Total face value of every freebet logged this month.
    pub total_value: f64,
    /// Total realized profit across extracted freebets.
    pub total_profit: f64,
    /// Realized profit over the face value of extracted freebets, as a
    /// percentage rounded to 2 decimal places. Zero when nothing extracted.
    pub avg_extraction_percent: f64,
}

/// Reduce the ledger into per-month statistics, oldest month first.
///
/// A freebet belongs to the month of its `recorded_at` date. Expiry is
/// evaluated against the supplied `now`, so an expired-but-extracted bet
/// counts in both columns, exactly as the ledger displays it.
pub fn monthly_breakdown(freebets: &[Freebet], now: DateTime<Utc>) -> Vec<MonthlyStats> {
    let mut groups: BTreeMap<(i32, u32), Vec<&Freebet>> = BTreeMap::new();
    for fb in freebets {
        groups
            .entry((fb.recorded_at.year(), fb.recorded_at.month()))
            .or_default()
            .push(fb);
    }

    groups
        .into_iter()
        .map(|((year, month), group)| summarize(year, month, &group, now))
        .collect()
}

fn summarize(year: i32, month: u32, group: &[&Freebet], now: DateTime<Utc>) -> MonthlyStats {
    let extracted = group.iter().filter(|fb| fb.extracted).count() as u32;
    let lost = group.iter().filter(|fb| fb.is_lost()).count() as u32;
    let expired = group.iter().filter(|fb| fb.is_expired(now)).count() as u32;

    let total_value: f64 = group.iter().map(|fb| fb.face_value).sum();
    let total_profit: f64 = group
        .iter()
        .filter(|fb| fb.extracted)
        .map(|fb| fb.extracted_value.unwrap_or(0.0))
        .sum();
    let extracted_face: f64 = group
        .iter()
        .filter(|fb| fb.extracted)
        .map(|fb| fb.face_value)
        .sum();

    let avg_extraction_percent = if extracted > 0 && extracted_face > 0.0 {
        round2(total_profit / extracted_face * 100.0)
    } else {
        0.0
    };

    MonthlyStats {
        year,
        month,
        extracted,
        lost,
        expired,
        total_value,
        total_profit,
        avg_extraction_percent,
    }
}
