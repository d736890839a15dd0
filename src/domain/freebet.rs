//! Freebet ledger entity.
//!
//! A `Freebet` is one promotional bet credit tracked from the moment the
//! user logs it until it is extracted, lost or expires. The entity is a
//! plain serializable record; lifecycle transitions are explicit methods
//! so every mutation site reads the same.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked promotional bet credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freebet {
    /// Stable record ID, assigned client-side at creation.
    pub id: Uuid,
    /// Bookmaker that issued the promotion.
    pub bookmaker: String,
    /// Face value of the freebet in currency units.
    pub face_value: f64,
    /// Minimum odds the promotion requires the back bet to meet.
    pub min_odds: f64,
    /// Free-form status note ("pending rollover", "credited", ...).
    pub status: String,
    /// When the freebet was logged.
    pub recorded_at: DateTime<Utc>,
    /// Promotion expiry, if the bookmaker set one.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the freebet has been placed.
    pub used: bool,
    /// Whether the hedge settled and real cash was extracted.
    pub extracted: bool,
    /// Realized profit once extracted.
    pub extracted_value: Option<f64>,
}

/// User-supplied fields for creating a new ledger entry.
///
/// ID, timestamps and lifecycle flags are assigned by the ledger, not the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreebetDraft {
    pub bookmaker: String,
    pub face_value: f64,
    pub min_odds: f64,
    pub status: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Freebet {
    /// Materialize a draft into a fresh, unused ledger entry.
    pub fn from_draft(draft: FreebetDraft, id: Uuid, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id,
            bookmaker: draft.bookmaker,
            face_value: draft.face_value,
            min_odds: draft.min_odds,
            status: draft.status,
            recorded_at,
            expires_at: draft.expires_at,
            used: false,
            extracted: false,
            extracted_value: None,
        }
    }

    /// Whether the promotion expired before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| now > deadline)
    }

    /// Record a settled hedge: the freebet was placed and `realized_profit`
    /// in real cash came out the other side.
    pub fn mark_extracted(&mut self, realized_profit: f64) {
        self.used = true;
        self.extracted = true;
        self.extracted_value = Some(realized_profit);
    }

    /// Used but never extracted — the hedge (or the bet) was lost.
    pub fn is_lost(&self) -> bool {
        self.used && !self.extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> FreebetDraft {
        FreebetDraft {
            bookmaker: "bet365".to_string(),
            face_value: 50.0,
            min_odds: 1.5,
            status: "credited".to_string(),
            expires_at: None,
        }
    }

    #[test]
    fn test_from_draft_starts_unused() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let fb = Freebet::from_draft(draft(), Uuid::new_v4(), now);
        assert!(!fb.used);
        assert!(!fb.extracted);
        assert_eq!(fb.extracted_value, None);
        assert_eq!(fb.recorded_at, now);
    }

    #[test]
    fn test_mark_extracted_sets_flags_and_value() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut fb = Freebet::from_draft(draft(), Uuid::new_v4(), now);
        fb.mark_extracted(37.84);
        assert!(fb.used);
        assert!(fb.extracted);
        assert_eq!(fb.extracted_value, Some(37.84));
        assert!(!fb.is_lost());
    }

    #[test]
    fn test_used_without_extraction_is_lost() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut fb = Freebet::from_draft(draft(), Uuid::new_v4(), now);
        fb.used = true;
        assert!(fb.is_lost());
    }

    #[test]
    fn test_expiry_against_supplied_now() {
        let recorded = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let deadline = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let mut d = draft();
        d.expires_at = Some(deadline);
        let fb = Freebet::from_draft(d, Uuid::new_v4(), recorded);

        let before = Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();
        assert!(!fb.is_expired(before));
        assert!(fb.is_expired(after));
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let fb = Freebet::from_draft(draft(), Uuid::new_v4(), now);
        assert!(!fb.is_expired(now));
    }
}
