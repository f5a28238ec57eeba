//! Criterion benchmarks for the analysis hot paths.
//!
//! Benchmarks:
//! 1. Indicator frame precompute
//! 2. Full single-symbol analysis
//! 3. Scoring of a crowded signal set

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use trendscan_core::config::IndicatorParams;
use trendscan_core::domain::Bar;
use trendscan_core::indicators::IndicatorFrame;
use trendscan_core::regime::{RegimeAssessment, RegimeLabel};
use trendscan_core::scoring::{ScoringEngine, WeightTable};
use trendscan_core::signals::SignalKind;
use trendscan_core::{AnalysisInput, Analyzer, EngineConfig};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2018, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.02;
            let open = close - 0.3;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: close + 1.5,
                low: open - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

// ── 1. Indicator frame ───────────────────────────────────────────────

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_frame");
    let params = IndicatorParams::default();

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);
        group.bench_with_input(BenchmarkId::new("compute", bar_count), &bar_count, |b, _| {
            b.iter(|| IndicatorFrame::compute(black_box(&bars), black_box(&params)));
        });
    }

    group.finish();
}

// ── 2. Full analysis ─────────────────────────────────────────────────

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let analyzer = Analyzer::new(EngineConfig::default()).unwrap();

    for &bar_count in &[252, 1260] {
        let input = AnalysisInput::new("BENCH", make_bars(bar_count));
        group.bench_with_input(BenchmarkId::new("latest_bar", bar_count), &bar_count, |b, _| {
            b.iter(|| analyzer.analyze(black_box(&input)));
        });
    }

    group.finish();
}

// ── 3. Scoring ───────────────────────────────────────────────────────

fn bench_scoring(c: &mut Criterion) {
    let engine = ScoringEngine::new(WeightTable::default());
    let regime = RegimeAssessment::bare(RegimeLabel::Range);
    let kinds = SignalKind::ALL.to_vec();

    c.bench_function("score_all_52_kinds", |b| {
        b.iter(|| engine.score(black_box(&kinds), black_box(&regime)));
    });
}

criterion_group!(benches, bench_frame, bench_analyze, bench_scoring);
criterion_main!(benches);
