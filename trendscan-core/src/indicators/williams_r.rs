//! Williams %R: where the close sits inside the recent high/low range.
//!
//! %R = -100 * (highest_high - close) / (highest_high - lowest_low), in [-100, 0].
//! Near 0 is the top of the range, near -100 the bottom.
//! Lookback: period - 1.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::series::{rolling_max, rolling_min};

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
    name: String,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Williams %R period must be >= 1");
        Self {
            period,
            name: format!("williams_r_{period}"),
        }
    }
}

impl Indicator for WilliamsR {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let hh = rolling_max(&highs, self.period);
        let ll = rolling_min(&lows, self.period);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let span = hh[i] - ll[i];
                if span.is_nan() || bar.close.is_nan() {
                    f64::NAN
                } else if span == 0.0 {
                    -50.0
                } else {
                    -100.0 * (hh[i] - bar.close) / span
                }
            })
            .collect()
    }
}
