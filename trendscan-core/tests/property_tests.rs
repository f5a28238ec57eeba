//! Property tests for the scoring and risk invariants.
//!
//! Covers:
//! 1. Position size bounds
//! 2. Stop placement side
//! 3. Category exclusivity
//! 4. Regime gating
//! 5. Deterministic analysis
//! 6. Insufficient history

use chrono::NaiveDate;
use proptest::prelude::*;
use trendscan_core::config::RiskParams;
use trendscan_core::domain::Bar;
use trendscan_core::regime::{RegimeAssessment, RegimeLabel};
use trendscan_core::risk::{position_size_pct, stop_level, StopStance};
use trendscan_core::scoring::{ScoringEngine, SuppressionReason, WeightTable};
use trendscan_core::signals::{Category, GateRule, SignalKind};
use trendscan_core::{AnalysisInput, AnalysisOutcome, Analyzer, EngineConfig};

// ── Strategies ──

fn arb_kinds() -> impl Strategy<Value = Vec<SignalKind>> {
    proptest::sample::subsequence(SignalKind::ALL.to_vec(), 0..=SignalKind::ALL.len())
}

fn arb_label() -> impl Strategy<Value = RegimeLabel> {
    prop_oneof![Just(RegimeLabel::Trend), Just(RegimeLabel::Range)]
}

/// Random walk from 50, with daily moves of at most 4%.
fn arb_bars(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((-0.04..0.04f64, 0.0..0.02f64, 1_000u64..1_000_000), len).prop_map(
        |steps| {
            let base = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
            let mut close = 50.0;
            steps
                .into_iter()
                .enumerate()
                .map(|(i, (ret, spread, volume))| {
                    let open = close;
                    close = open * (1.0 + ret);
                    Bar {
                        date: base + chrono::Duration::days(i as i64),
                        open,
                        high: open.max(close) * (1.0 + spread),
                        low: open.min(close) * (1.0 - spread),
                        close,
                        volume,
                    }
                })
                .collect()
        },
    )
}

// ── 1. Position size bounds ──

proptest! {
    #[test]
    fn size_is_bounded(
        score in -20.0..20.0f64,
        price in 1.0..1000.0f64,
        stop_frac in 0.001..0.5f64,
    ) {
        let params = RiskParams::default();
        let stop = price * (1.0 - stop_frac);
        let size = position_size_pct(score, price, stop, &params).unwrap();
        prop_assert!(!size.is_nan());
        prop_assert!((0.0..=params.max_position_pct).contains(&size), "size {}", size);
        if score < params.min_conviction {
            prop_assert_eq!(size, 0.0);
        }
    }

    #[test]
    fn zero_distance_has_no_size(score in -20.0..20.0f64, price in 1.0..1000.0f64) {
        prop_assert_eq!(position_size_pct(score, price, price, &RiskParams::default()), None);
    }
}

// ── 2. Stop placement side ──

proptest! {
    #[test]
    fn stop_sits_on_the_stance_side(
        price in 1.0..1000.0f64,
        atr_frac in 0.001..0.2f64,
        sar_frac in -0.3..0.3f64,
    ) {
        let atr = price * atr_frac;
        let sar = price * (1.0 + sar_frac);
        if let Some(level) = stop_level(price, atr, sar, &RiskParams::default()) {
            match level.stance {
                StopStance::ProtectiveStop => {
                    prop_assert!(sar < price);
                    prop_assert!(level.price < price);
                }
                StopStance::ReclaimLevel => {
                    prop_assert!(sar > price);
                    prop_assert!(level.price > price);
                }
            }
        }
    }
}

// ── 3. Category exclusivity ──

proptest! {
    #[test]
    fn at_most_one_active_per_exclusive_category(kinds in arb_kinds(), label in arb_label()) {
        let engine = ScoringEngine::new(WeightTable::default());
        let report = engine.score(&kinds, &RegimeAssessment::bare(label));

        for category in Category::ALL.into_iter().filter(|c| c.is_exclusive()) {
            let count = report.active.iter().filter(|s| s.category == category).count();
            prop_assert!(count <= 1, "{:?} has {} active", category, count);
        }
        prop_assert_eq!(report.active.len() + report.suppressed.len(), kinds.len());

        let sum: f64 = report.active.iter().map(|s| s.raw_score).sum();
        prop_assert!((report.total_score - sum).abs() < 1e-9);
    }

    #[test]
    fn input_order_does_not_matter(kinds in arb_kinds(), label in arb_label()) {
        let engine = ScoringEngine::new(WeightTable::default());
        let regime = RegimeAssessment::bare(label);
        let mut reversed = kinds.clone();
        reversed.reverse();
        prop_assert_eq!(engine.score(&kinds, &regime), engine.score(&reversed, &regime));
    }
}

// ── 4. Regime gating ──

proptest! {
    #[test]
    fn gated_kinds_follow_the_regime(kinds in arb_kinds()) {
        let engine = ScoringEngine::new(WeightTable::default());
        let trend = engine.score(&kinds, &RegimeAssessment::bare(RegimeLabel::Trend));
        let range = engine.score(&kinds, &RegimeAssessment::bare(RegimeLabel::Range));

        for kind in &kinds {
            let gated_in_trend = matches!(
                trend.suppression(*kind),
                Some(SuppressionReason::RegimeGated { .. })
            );
            let gated_in_range = matches!(
                range.suppression(*kind),
                Some(SuppressionReason::RegimeGated { .. })
            );
            match kind.spec().gate {
                GateRule::SuppressInTrend => {
                    prop_assert!(gated_in_trend);
                    prop_assert!(!gated_in_range);
                }
                GateRule::SuppressInRange => {
                    prop_assert!(!gated_in_trend);
                    prop_assert!(gated_in_range);
                }
                GateRule::Never => {
                    prop_assert!(!gated_in_trend && !gated_in_range);
                }
            }
        }

        for report in [&trend, &range] {
            for entry in &report.suppressed {
                if matches!(entry.reason, SuppressionReason::RegimeGated { .. }) {
                    prop_assert_eq!(entry.signal.raw_score, 0.0);
                }
            }
        }
    }
}

// ── 5. Deterministic analysis ──

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn analysis_is_deterministic(bars in arb_bars(100..260)) {
        let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
        let input = AnalysisInput::new("PROP", bars);
        let a = serde_json::to_string(&analyzer.analyze(&input)).unwrap();
        let b = serde_json::to_string(&analyzer.analyze(&input)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn complete_reports_respect_size_cap(bars in arb_bars(100..260)) {
        let config = EngineConfig::default();
        let cap = config.risk.max_position_pct;
        let analyzer = Analyzer::new(config).unwrap();
        let outcome = analyzer.analyze(&AnalysisInput::new("PROP", bars));
        let report = outcome.into_report().unwrap();
        if let Some(size) = report.risk.and_then(|r| r.position_size_pct) {
            prop_assert!((0.0..=cap).contains(&size));
        }
    }
}

// ── 6. Insufficient history ──

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn short_series_emit_nothing(bars in arb_bars(0..100)) {
        let available = bars.len();
        let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
        let outcome = analyzer.analyze(&AnalysisInput::new("SHORT", bars));
        prop_assert_eq!(
            outcome,
            AnalysisOutcome::InsufficientHistory { required: 100, available }
        );
    }
}
