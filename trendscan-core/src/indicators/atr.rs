//! Average True Range (ATR), Wilder-smoothed.
//!
//! TR[0] has no previous close and is NaN, so the first ATR value lands at
//! index `period`. `AtrPercent` expresses ATR as a percentage of close.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::series::{true_range, wilder_smooth};

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        wilder_smooth(&true_range(bars), self.period)
    }
}

/// ATR / close * 100. NaN where close is not positive.
#[derive(Debug, Clone)]
pub struct AtrPercent {
    atr: Atr,
    name: String,
}

impl AtrPercent {
    pub fn new(period: usize) -> Self {
        Self {
            atr: Atr::new(period),
            name: format!("atr_pct_{period}"),
        }
    }
}

impl Indicator for AtrPercent {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.atr.lookback()
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.atr
            .compute(bars)
            .into_iter()
            .zip(bars)
            .map(|(atr, bar)| {
                if bar.close > 0.0 {
                    atr / bar.close * 100.0
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}
