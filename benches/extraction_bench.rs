//! Extraction Calculator Benchmarks — Hot-Path Performance Validation
//!
//! Benchmarks the domain functions that run on every calculator keystroke
//! and every stats-page load.
//!
//! Run with: cargo bench --bench extraction_bench

use chrono::{TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use uuid::Uuid;

use freebet_tracker::domain::extraction::{ExtractionCalculator, ExtractionInput};
use freebet_tracker::domain::freebet::{Freebet, FreebetDraft};
use freebet_tracker::domain::stats::monthly_breakdown;

fn reference_input() -> ExtractionInput {
    ExtractionInput {
        stake: 50.0,
        back_odds: 5.0,
        lay_odds: 5.2,
        commission_percent: 2.0,
    }
}

/// Benchmark the rounded quote path (what the API serves).
fn bench_quote(c: &mut Criterion) {
    let calc = ExtractionCalculator::new();
    let input = reference_input();

    c.bench_function("extraction_quote", |b| {
        b.iter(|| {
            let _quote = calc.quote(black_box(&input));
        });
    });
}

/// Benchmark the full-precision breakdown.
fn bench_breakdown(c: &mut Criterion) {
    let calc = ExtractionCalculator::new();
    let input = reference_input();

    c.bench_function("extraction_breakdown", |b| {
        b.iter(|| {
            let _raw = calc.breakdown(black_box(&input));
        });
    });
}

/// Benchmark a year of monthly stats over a thousand-entry ledger.
fn bench_monthly_breakdown(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
    let ledger: Vec<Freebet> = (0..1000)
        .map(|i| {
            let month = (i % 12 + 1) as u32;
            let recorded = Utc.with_ymd_and_hms(2024, month, 10, 12, 0, 0).unwrap();
            let mut fb = Freebet::from_draft(
                FreebetDraft {
                    bookmaker: format!("bookie-{}", i % 7),
                    face_value: 25.0 + (i % 4) as f64 * 25.0,
                    min_odds: 1.5,
                    status: "credited".to_string(),
                    expires_at: None,
                },
                Uuid::new_v4(),
                recorded,
            );
            if i % 3 == 0 {
                fb.mark_extracted(fb.face_value * 0.75);
            }
            fb
        })
        .collect();

    c.bench_function("monthly_breakdown_1000", |b| {
        b.iter(|| {
            let _stats = monthly_breakdown(black_box(&ledger), black_box(now));
        });
    });
}

criterion_group!(benches, bench_quote, bench_breakdown, bench_monthly_breakdown);
criterion_main!(benches);
