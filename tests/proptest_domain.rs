//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that the hedge calculator and the stats
//! reducer maintain mathematical invariants across random inputs.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use freebet_tracker::domain::extraction::{
    ExtractionCalculator, ExtractionInput, round2,
};
use freebet_tracker::domain::freebet::{Freebet, FreebetDraft};
use freebet_tracker::domain::stats::monthly_breakdown;

fn input(stake: f64, back: f64, lay: f64, commission: f64) -> ExtractionInput {
    ExtractionInput {
        stake,
        back_odds: back,
        lay_odds: lay,
        commission_percent: commission,
    }
}

// ── Extraction Calculator Properties ────────────────────────

proptest! {
    /// Identical inputs must produce identical quotes.
    #[test]
    fn quote_is_deterministic(
        stake in 1.0f64..500.0,
        back in 1.05f64..20.0,
        lay in 1.05f64..20.0,
        commission in 0.0f64..20.0,
    ) {
        let calc = ExtractionCalculator::new();
        let first = calc.quote(&input(stake, back, lay, commission)).unwrap();
        let second = calc.quote(&input(stake, back, lay, commission)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Reported profit is the worst case of the two outcome branches.
    #[test]
    fn profit_is_worst_case_branch(
        stake in 1.0f64..500.0,
        back in 1.05f64..20.0,
        lay in 1.05f64..20.0,
        commission in 0.0f64..20.0,
    ) {
        let calc = ExtractionCalculator::new();
        let raw = calc.breakdown(&input(stake, back, lay, commission)).unwrap();
        prop_assert!(raw.profit <= raw.back_wins_profit);
        prop_assert!(raw.profit <= raw.lay_wins_profit);
        let min = raw.back_wins_profit.min(raw.lay_wins_profit);
        prop_assert_eq!(raw.profit, min);
    }

    /// With zero commission the lay-wins branch pays the full lay stake.
    #[test]
    fn zero_commission_pays_full_lay_stake(
        stake in 1.0f64..500.0,
        back in 1.05f64..20.0,
        lay in 1.05f64..20.0,
    ) {
        let calc = ExtractionCalculator::new();
        let raw = calc.breakdown(&input(stake, back, lay, 0.0)).unwrap();
        prop_assert_eq!(raw.lay_wins_profit, raw.lay_stake);
    }

    /// Raising commission with everything else fixed lowers profit.
    #[test]
    fn commission_strictly_lowers_profit(
        stake in 1.0f64..500.0,
        back in 1.05f64..20.0,
        lay in 1.05f64..20.0,
        low in 0.0f64..10.0,
        bump in 0.5f64..10.0,
    ) {
        let calc = ExtractionCalculator::new();
        let cheap = calc.breakdown(&input(stake, back, lay, low)).unwrap();
        let dear = calc.breakdown(&input(stake, back, lay, low + bump)).unwrap();
        prop_assert!(
            dear.profit < cheap.profit,
            "profit {} at {}% should beat {} at {}%",
            cheap.profit, low, dear.profit, low + bump
        );
    }

    /// Doubling the stake doubles the money amounts and leaves the
    /// extraction percentage unchanged.
    #[test]
    fn doubling_stake_scales_linearly(
        stake in 1.0f64..500.0,
        back in 1.05f64..20.0,
        lay in 1.05f64..20.0,
        commission in 0.0f64..20.0,
    ) {
        let calc = ExtractionCalculator::new();
        let base = calc.breakdown(&input(stake, back, lay, commission)).unwrap();
        let doubled = calc
            .breakdown(&input(stake * 2.0, back, lay, commission))
            .unwrap();

        let rel = |a: f64, b: f64| (a - b).abs() / b.abs().max(1e-12);
        prop_assert!(rel(doubled.lay_stake, base.lay_stake * 2.0) < 1e-9);
        prop_assert!(rel(doubled.liability, base.liability * 2.0) < 1e-9);
        prop_assert!(rel(doubled.profit, base.profit * 2.0) < 1e-9);
        prop_assert!(
            (doubled.extraction_percent - base.extraction_percent).abs() < 1e-9
        );
    }

    /// Quotes never leak NaN or infinity to callers.
    #[test]
    fn quote_outputs_are_finite(
        stake in 1.0f64..500.0,
        back in 1.05f64..20.0,
        lay in 1.05f64..20.0,
        commission in 0.0f64..20.0,
    ) {
        let calc = ExtractionCalculator::new();
        let quote = calc.quote(&input(stake, back, lay, commission)).unwrap();
        prop_assert!(quote.lay_stake.is_finite());
        prop_assert!(quote.liability.is_finite());
        prop_assert!(quote.profit.is_finite());
        prop_assert!(quote.extraction_percent.is_finite());
    }
}

// ── Rounding Properties ─────────────────────────────────────

proptest! {
    /// Rounding is idempotent and stays within half a cent.
    #[test]
    fn round2_is_idempotent_and_close(value in -10_000.0f64..10_000.0) {
        let once = round2(value);
        prop_assert_eq!(round2(once), once);
        prop_assert!((once - value).abs() <= 0.005 + 1e-9);
    }
}

// ── Monthly Stats Properties ────────────────────────────────

proptest! {
    /// Per-month face values sum back to the whole ledger.
    #[test]
    fn monthly_totals_cover_the_ledger(
        values in prop::collection::vec(1.0f64..200.0, 1..40),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let ledger: Vec<Freebet> = values
            .iter()
            .enumerate()
            .map(|(i, &face_value)| {
                let month = (i % 5 + 1) as u32;
                let recorded =
                    Utc.with_ymd_and_hms(2024, month, 10, 12, 0, 0).unwrap();
                Freebet::from_draft(
                    FreebetDraft {
                        bookmaker: "betfair".to_string(),
                        face_value,
                        min_odds: 1.5,
                        status: "credited".to_string(),
                        expires_at: None,
                    },
                    Uuid::new_v4(),
                    recorded,
                )
            })
            .collect();

        let stats = monthly_breakdown(&ledger, now);
        let ledger_total: f64 = values.iter().sum();
        let stats_total: f64 = stats.iter().map(|m| m.total_value).sum();
        prop_assert!((ledger_total - stats_total).abs() < 1e-6);

        let counted: u32 = stats
            .iter()
            .map(|m| m.extracted + m.lost)
            .sum();
        prop_assert_eq!(counted, 0, "untouched freebets are neither won nor lost");
    }
}
