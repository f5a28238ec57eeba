//! Parabolic SAR: the trend-following stop-and-reverse line.
//!
//! Stateful walk over the bars tracking side, extreme point and acceleration
//! factor. Below price while long, above price while short.
//! Lookback: 1 (the first value lands on the second bar).

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct ParabolicSar {
    af_start: f64,
    af_step: f64,
    af_max: f64,
    name: String,
}

#[derive(Debug, Clone, Copy)]
struct SarState {
    long: bool,
    sar: f64,
    extreme: f64,
    af: f64,
}

impl ParabolicSar {
    pub fn new(af_start: f64, af_step: f64, af_max: f64) -> Self {
        assert!(af_start > 0.0 && af_step > 0.0, "acceleration factors must be > 0");
        assert!(af_max >= af_start, "af_max must be >= af_start");
        Self {
            af_start,
            af_step,
            af_max,
            name: format!("psar_{af_start}_{af_step}_{af_max}"),
        }
    }

    /// Wilder's defaults: 0.02 / 0.02 / 0.20.
    pub fn default_params() -> Self {
        Self::new(0.02, 0.02, 0.20)
    }

    fn step(&self, s: SarState, bars: &[Bar], i: usize) -> SarState {
        let bar = &bars[i];
        let mut next = s.sar + s.af * (s.extreme - s.sar);

        if s.long {
            next = next.min(bars[i - 1].low).min(bars[i - 2].low);
            if bar.low < next {
                return SarState {
                    long: false,
                    sar: s.extreme,
                    extreme: bar.low,
                    af: self.af_start,
                };
            }
            let (extreme, af) = if bar.high > s.extreme {
                (bar.high, (s.af + self.af_step).min(self.af_max))
            } else {
                (s.extreme, s.af)
            };
            SarState { long: true, sar: next, extreme, af }
        } else {
            next = next.max(bars[i - 1].high).max(bars[i - 2].high);
            if bar.high > next {
                return SarState {
                    long: true,
                    sar: s.extreme,
                    extreme: bar.high,
                    af: self.af_start,
                };
            }
            let (extreme, af) = if bar.low < s.extreme {
                (bar.low, (s.af + self.af_step).min(self.af_max))
            } else {
                (s.extreme, s.af)
            };
            SarState { long: false, sar: next, extreme, af }
        }
    }
}

impl Indicator for ParabolicSar {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut out = vec![f64::NAN; n];
        if n < 2 || bars[..2].iter().any(Bar::is_void) {
            return out;
        }

        let long = bars[1].close >= bars[0].close;
        let mut state = SarState {
            long,
            sar: if long { bars[0].low } else { bars[0].high },
            extreme: if long { bars[1].high } else { bars[1].low },
            af: self.af_start,
        };
        out[1] = state.sar;

        for i in 2..n {
            if bars[i - 2..=i].iter().any(Bar::is_void) {
                // Void bars end the walk; later values would rest on a broken state.
                break;
            }
            state = self.step(state, bars, i);
            out[i] = state.sar;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    #[test]
    fn sar_trails_below_an_uptrend() {
        let data: Vec<_> = (0..15)
            .map(|i| {
                let b = 40.0 + i as f64 * 1.5;
                (b, b + 1.0, b - 0.5, b + 0.8)
            })
            .collect();
        let bars = make_ohlc_bars(&data);
        let sar = ParabolicSar::default_params().compute(&bars);
        for i in 2..bars.len() {
            assert!(sar[i] < bars[i].low, "bar {i}: sar {} low {}", sar[i], bars[i].low);
        }
    }

    #[test]
    fn sar_flips_above_after_collapse() {
        let bars = make_ohlc_bars(&[
            (60.0, 62.0, 59.0, 61.5),
            (61.5, 64.0, 61.0, 63.5),
            (63.5, 66.0, 63.0, 65.5),
            (65.5, 67.0, 65.0, 66.5),
            (66.5, 66.8, 58.0, 58.5),
            (58.5, 59.0, 54.0, 54.5),
        ]);
        let sar = ParabolicSar::default_params().compute(&bars);
        assert!(sar[3] < bars[3].close);
        assert!(sar[5] > bars[5].close);
    }

    #[test]
    fn af_cap_keeps_sar_finite() {
        let data: Vec<_> = (0..40)
            .map(|i| {
                let b = 10.0 + i as f64;
                (b, b + 1.0, b - 0.5, b + 0.8)
            })
            .collect();
        let bars = make_ohlc_bars(&data);
        let sar = ParabolicSar::new(0.02, 0.02, 0.10).compute(&bars);
        assert!(sar[1..].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn single_bar_is_nan() {
        let bars = make_ohlc_bars(&[(10.0, 11.0, 9.0, 10.5)]);
        assert!(ParabolicSar::default_params().compute(&bars)[0].is_nan());
    }
}
