//! Freebet extraction calculator.
//!
//! Computes the lay stake, liability and guaranteed profit for hedging a
//! stake-not-returned (SNR) freebet: a back bet placed with promotional
//! funds against a lay bet placed with real money on an exchange that
//! charges commission on the lay side's net win.
//!
//! Exposes a presentation API (`quote`, rounded to 2 decimal places) and a
//! full-precision API (`breakdown`) for internal reuse and property checks.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest hedge denominator (`lay_odds - commission/100`) accepted before
/// the lay stake blows up into a number no exchange would match.
const MIN_HEDGE_DENOMINATOR: f64 = 1e-3;

/// Input tuple for a single extraction computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionInput {
    /// Freebet face value in currency units.
    pub stake: f64,
    /// Decimal odds of the back (bookmaker) leg. Must be > 1.
    pub back_odds: f64,
    /// Decimal odds of the lay (exchange) leg. Must be > 1.
    pub lay_odds: f64,
    /// Exchange commission rate as a percentage in [0, 100).
    pub commission_percent: f64,
}

/// Presentation-rounded hedge quote. Each field is rounded to 2 decimal
/// places independently at the return boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionQuote {
    /// Amount to place on the lay side.
    pub lay_stake: f64,
    /// Exchange exposure if the lay bet loses.
    pub liability: f64,
    /// Guaranteed profit regardless of outcome.
    pub profit: f64,
    /// Profit as a percentage of the freebet face value.
    pub extraction_percent: f64,
}

/// Full-precision hedge breakdown including both outcome branches.
///
/// No rounding is applied anywhere in this struct; use it when the two
/// scenario profits matter or when chaining further arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionBreakdown {
    pub lay_stake: f64,
    pub liability: f64,
    /// Net result if the back (freebet) leg wins.
    pub back_wins_profit: f64,
    /// Net result if the lay leg wins, after commission.
    pub lay_wins_profit: f64,
    /// Worst case of the two branches.
    pub profit: f64,
    pub extraction_percent: f64,
}

/// Calculator failure modes.
///
/// `InvalidInput` covers precondition violations on individual fields;
/// `InvalidHedgeConfiguration` covers in-range inputs whose combination
/// makes the hedge mathematically unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
    #[error(
        "hedge impossible: lay odds {lay_odds} minus {commission_percent}% commission \
         leaves denominator {denominator}"
    )]
    InvalidHedgeConfiguration {
        lay_odds: f64,
        commission_percent: f64,
        denominator: f64,
    },
}

impl ExtractionError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Stateless SNR freebet hedge calculator.
///
/// Safe to invoke on every input change; pure arithmetic, no shared state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionCalculator;

impl ExtractionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the hedge with full floating-point precision.
    ///
    /// Derivation (SNR — the freebet stake itself is never returned):
    /// only the net winnings `stake * (back_odds - 1)` are at risk of being
    /// hedged away, so the lay stake divides them by the commission-adjusted
    /// odds term. With that stake the two branches settle to the same value
    /// up to floating-point error; the reported profit is their minimum.
    pub fn breakdown(
        &self,
        input: &ExtractionInput,
    ) -> Result<ExtractionBreakdown, ExtractionError> {
        validate(input)?;

        let commission = input.commission_percent / 100.0;
        let denominator = input.lay_odds - commission;
        if denominator < MIN_HEDGE_DENOMINATOR {
            return Err(ExtractionError::InvalidHedgeConfiguration {
                lay_odds: input.lay_odds,
                commission_percent: input.commission_percent,
                denominator,
            });
        }

        let lay_stake = input.stake * (input.back_odds - 1.0) / denominator;
        let liability = lay_stake * (input.lay_odds - 1.0);
        let back_wins_profit = input.stake * (input.back_odds - 1.0) - liability;
        let lay_wins_profit = lay_stake - lay_stake * commission;
        let profit = back_wins_profit.min(lay_wins_profit);
        let extraction_percent = profit / input.stake * 100.0;

        Ok(ExtractionBreakdown {
            lay_stake,
            liability,
            back_wins_profit,
            lay_wins_profit,
            profit,
            extraction_percent,
        })
    }

    /// Compute the hedge and round each output to 2 decimal places.
    ///
    /// Rounding happens on the four returned fields independently, never on
    /// intermediate values. Extraction percent is not clamped; a negative
    /// value means a money-losing configuration and is reported as-is.
    pub fn quote(
        &self,
        input: &ExtractionInput,
    ) -> Result<ExtractionQuote, ExtractionError> {
        let raw = self.breakdown(input)?;
        Ok(ExtractionQuote {
            lay_stake: round2(raw.lay_stake),
            liability: round2(raw.liability),
            profit: round2(raw.profit),
            extraction_percent: round2(raw.extraction_percent),
        })
    }
}

fn validate(input: &ExtractionInput) -> Result<(), ExtractionError> {
    // NaN fails every comparison below, so it is rejected with the rest.
    if !(input.stake > 0.0) || !input.stake.is_finite() {
        return Err(ExtractionError::invalid(
            "stake",
            format!("must be a positive amount, got {}", input.stake),
        ));
    }
    if !(input.back_odds > 1.0) || !input.back_odds.is_finite() {
        return Err(ExtractionError::invalid(
            "back_odds",
            format!("decimal odds must be > 1, got {}", input.back_odds),
        ));
    }
    if !(input.lay_odds > 1.0) || !input.lay_odds.is_finite() {
        return Err(ExtractionError::invalid(
            "lay_odds",
            format!("decimal odds must be > 1, got {}", input.lay_odds),
        ));
    }
    if !(input.commission_percent >= 0.0 && input.commission_percent < 100.0) {
        return Err(ExtractionError::invalid(
            "commission_percent",
            format!("must be in [0, 100), got {}", input.commission_percent),
        ));
    }
    Ok(())
}

/// Round to 2 decimal places, midpoint away from zero.
///
/// Matches the display contract of the ledger and the stats aggregator.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(stake: f64, back: f64, lay: f64, commission: f64) -> ExtractionInput {
        ExtractionInput {
            stake,
            back_odds: back,
            lay_odds: lay,
            commission_percent: commission,
        }
    }

    #[test]
    fn test_reference_quote_with_commission() {
        let calc = ExtractionCalculator::new();
        let quote = calc.quote(&input(50.0, 5.0, 5.2, 2.0)).unwrap();
        assert_eq!(quote.lay_stake, 38.61);
        assert_eq!(quote.liability, 162.16);
        assert_eq!(quote.profit, 37.84);
        assert_eq!(quote.extraction_percent, 75.68);
    }

    #[test]
    fn test_reference_quote_zero_commission() {
        let calc = ExtractionCalculator::new();
        let quote = calc.quote(&input(100.0, 3.0, 3.0, 0.0)).unwrap();
        assert_eq!(quote.lay_stake, 66.67);
        assert_eq!(quote.liability, 133.33);
        assert_eq!(quote.profit, 66.67);
        assert_eq!(quote.extraction_percent, 66.67);
    }

    #[test]
    fn test_branches_balance() {
        let calc = ExtractionCalculator::new();
        let raw = calc.breakdown(&input(50.0, 5.0, 5.2, 2.0)).unwrap();
        // The lay stake is chosen so both branches settle equal.
        let diff = (raw.back_wins_profit - raw.lay_wins_profit).abs();
        assert!(diff < 1e-9, "branches should balance, diff {diff}");
        assert!(raw.profit <= raw.back_wins_profit);
        assert!(raw.profit <= raw.lay_wins_profit);
    }

    #[test]
    fn test_rejects_non_positive_stake() {
        let calc = ExtractionCalculator::new();
        let err = calc.quote(&input(0.0, 2.0, 2.1, 2.0)).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidInput { field: "stake", .. }
        ));
    }

    #[test]
    fn test_rejects_back_odds_at_one() {
        let calc = ExtractionCalculator::new();
        let err = calc.quote(&input(50.0, 1.0, 2.1, 2.0)).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidInput {
                field: "back_odds",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_lay_odds_at_one() {
        let calc = ExtractionCalculator::new();
        let err = calc.quote(&input(50.0, 2.0, 1.0, 2.0)).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidInput {
                field: "lay_odds",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_commission_at_hundred() {
        let calc = ExtractionCalculator::new();
        let err = calc.quote(&input(50.0, 2.0, 2.1, 100.0)).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidInput {
                field: "commission_percent",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_nan_stake() {
        let calc = ExtractionCalculator::new();
        assert!(calc.quote(&input(f64::NAN, 2.0, 2.1, 2.0)).is_err());
    }

    #[test]
    fn test_near_zero_denominator_is_hedge_error() {
        let calc = ExtractionCalculator::new();
        let err = calc.quote(&input(50.0, 2.0, 1.0001, 99.99)).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidHedgeConfiguration { .. }
        ));
    }

    #[test]
    fn test_commission_lowers_profit() {
        let calc = ExtractionCalculator::new();
        let free = calc.breakdown(&input(50.0, 4.0, 4.1, 0.0)).unwrap();
        let taxed = calc.breakdown(&input(50.0, 4.0, 4.1, 5.0)).unwrap();
        assert!(taxed.profit < free.profit);
    }

    #[test]
    fn test_round2_midpoint_away_from_zero() {
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(-0.005), -0.01);
        assert_eq!(round2(37.8378378), 37.84);
        assert_eq!(round2(66.666_666), 66.67);
    }
}
