//! Regime classification: trend vs range from ADX, plus an optional broad
//! market context from benchmark and volatility-gauge inputs.
//!
//! Regime only gates signals and shifts the baseline offset. It never
//! inverts a signal.

use serde::{Deserialize, Serialize};

use crate::config::RegimeParams;
use crate::domain::{BenchmarkTrend, MarketInputs};
use crate::signals::GateRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeLabel {
    Trend,
    Range,
}

impl RegimeLabel {
    /// ADX at or above the threshold is a trend. A missing ADX reads as range.
    pub fn from_adx(adx: Option<f64>, params: &RegimeParams) -> Self {
        match adx {
            Some(v) if v >= params.trend_adx => RegimeLabel::Trend,
            _ => RegimeLabel::Range,
        }
    }

    /// Whether a signal with this gate is suppressed under this regime.
    pub fn gates(self, gate: GateRule) -> bool {
        matches!(
            (self, gate),
            (RegimeLabel::Trend, GateRule::SuppressInTrend)
                | (RegimeLabel::Range, GateRule::SuppressInRange)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketContext {
    Bull,
    Bear,
    Panic,
}

impl MarketContext {
    /// Panic wins over everything; then the benchmark trend decides; with only
    /// a gauge, an elevated reading is bearish. No inputs means no context.
    pub fn classify(inputs: &MarketInputs, params: &RegimeParams) -> Option<Self> {
        let gauge = inputs.volatility_gauge.filter(|g| g.is_finite());
        if gauge.is_some_and(|g| g >= params.panic_gauge) {
            return Some(MarketContext::Panic);
        }
        match (inputs.benchmark_trend, gauge) {
            (Some(BenchmarkTrend::BelowLongAverage), _) => Some(MarketContext::Bear),
            (Some(BenchmarkTrend::AboveLongAverage), _) => Some(MarketContext::Bull),
            (None, Some(g)) if g >= params.elevated_gauge => Some(MarketContext::Bear),
            (None, Some(_)) => Some(MarketContext::Bull),
            (None, None) => None,
        }
    }

    pub fn offset(self, params: &RegimeParams) -> f64 {
        match self {
            MarketContext::Bull => params.bull_offset,
            MarketContext::Bear => params.bear_offset,
            MarketContext::Panic => params.panic_offset,
        }
    }
}

/// Regime state for one analysis. Recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegimeAssessment {
    pub label: RegimeLabel,
    pub adx: Option<f64>,
    pub context: Option<MarketContext>,
    pub baseline_offset: f64,
}

impl RegimeAssessment {
    pub fn assess(adx: Option<f64>, inputs: &MarketInputs, params: &RegimeParams) -> Self {
        let context = MarketContext::classify(inputs, params);
        Self {
            label: RegimeLabel::from_adx(adx, params),
            adx,
            context,
            baseline_offset: context.map_or(0.0, |c| c.offset(params)),
        }
    }

    /// Regime with no market context, for callers scoring a bare label.
    pub fn bare(label: RegimeLabel) -> Self {
        Self {
            label,
            adx: None,
            context: None,
            baseline_offset: 0.0,
        }
    }
}
