//! Money Flow Index: a volume-weighted RSI over typical price.
//!
//! Raw money flow = typical price * volume. Flow is positive when the typical
//! price rises from the previous bar, negative when it falls.
//! MFI = 100 * positive_sum / (positive_sum + negative_sum) over `period` bars.
//! Lookback: period.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Mfi {
    period: usize,
    name: String,
}

impl Mfi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "MFI period must be >= 1");
        Self {
            period,
            name: format!("mfi_{period}"),
        }
    }
}

impl Indicator for Mfi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut out = vec![f64::NAN; n];
        if n <= self.period {
            return out;
        }

        // (positive, negative) flow per bar; index 0 has no previous bar.
        let flows: Vec<Option<(f64, f64)>> = (0..n)
            .map(|i| {
                if i == 0 {
                    return None;
                }
                let tp = bars[i].typical_price();
                let prev = bars[i - 1].typical_price();
                if tp.is_nan() || prev.is_nan() {
                    return None;
                }
                let raw = tp * bars[i].volume as f64;
                Some(if tp > prev {
                    (raw, 0.0)
                } else if tp < prev {
                    (0.0, raw)
                } else {
                    (0.0, 0.0)
                })
            })
            .collect();

        for i in self.period..n {
            let window = &flows[i + 1 - self.period..=i];
            let Some((pos, neg)) = window.iter().try_fold((0.0, 0.0), |acc, f| {
                f.map(|(p, m)| (acc.0 + p, acc.1 + m))
            }) else {
                continue;
            };
            out[i] = if pos + neg == 0.0 {
                50.0
            } else {
                100.0 * pos / (pos + neg)
            };
        }
        out
    }
}
