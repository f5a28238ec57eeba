//! Double bottom / double top.
//!
//! Two confirmed pivots of similar depth inside the lookback window, with the
//! current bar making the first close through the neckline between them.

use crate::components::detector::PatternDetector;
use crate::config::PatternParams;
use crate::domain::Bar;
use crate::indicators::IndicatorFrame;
use crate::signals::SignalKind;

#[derive(Debug, Clone)]
pub struct DoubleExtremeDetector {
    lookback: usize,
    tolerance: f64,
    pivot_width: usize,
    min_separation: usize,
}

impl DoubleExtremeDetector {
    pub fn new(params: &PatternParams) -> Self {
        Self {
            lookback: params.extremum_lookback,
            tolerance: params.extremum_tolerance,
            pivot_width: params.pivot_width,
            min_separation: params.min_separation,
        }
    }

    /// Confirmed pivots in the window, oldest first. A pivot needs
    /// `pivot_width` bars on both sides, all before `index`.
    fn pivots(&self, values: &[f64], index: usize, low: bool) -> Vec<usize> {
        let w = self.pivot_width;
        let start = index.saturating_sub(self.lookback).max(w);
        let Some(end) = index.checked_sub(w + 1) else {
            return Vec::new();
        };
        (start..=end)
            .filter(|&j| {
                let v = values[j];
                if v.is_nan() {
                    return false;
                }
                let left = &values[j - w..j];
                let right = &values[j + 1..=j + w];
                if low {
                    left.iter().all(|&x| v < x) && right.iter().all(|&x| v <= x)
                } else {
                    left.iter().all(|&x| v > x) && right.iter().all(|&x| v >= x)
                }
            })
            .collect()
    }

    /// Most recent pivot pair at least `min_separation` apart.
    fn latest_pair(&self, pivots: &[usize]) -> Option<(usize, usize)> {
        let &b = pivots.last()?;
        let &a = pivots
            .iter()
            .rev()
            .find(|&&a| b >= a + self.min_separation)?;
        Some((a, b))
    }

    fn similar(&self, x: f64, y: f64) -> bool {
        let base = x.min(y);
        base > 0.0 && (x - y).abs() / base <= self.tolerance
    }

    fn double_bottom(&self, bars: &[Bar], index: usize) -> bool {
        let lows: Vec<f64> = bars[..=index].iter().map(|b| b.low).collect();
        let pivots = self.pivots(&lows, index, true);
        let Some((a, b)) = self.latest_pair(&pivots) else {
            return false;
        };
        if !self.similar(lows[a], lows[b]) {
            return false;
        }
        let floor = lows[a].min(lows[b]) * (1.0 - self.tolerance);
        if lows[b + 1..=index].iter().any(|&l| l < floor) {
            return false;
        }
        let neckline = bars[a + 1..b]
            .iter()
            .map(|bar| bar.high)
            .fold(f64::NEG_INFINITY, f64::max);
        bars[index].close > neckline && bars[index - 1].close <= neckline
    }

    fn double_top(&self, bars: &[Bar], index: usize) -> bool {
        let highs: Vec<f64> = bars[..=index].iter().map(|b| b.high).collect();
        let pivots = self.pivots(&highs, index, false);
        let Some((a, b)) = self.latest_pair(&pivots) else {
            return false;
        };
        if !self.similar(highs[a], highs[b]) {
            return false;
        }
        let ceiling = highs[a].max(highs[b]) * (1.0 + self.tolerance);
        if highs[b + 1..=index].iter().any(|&h| h > ceiling) {
            return false;
        }
        let neckline = bars[a + 1..b]
            .iter()
            .map(|bar| bar.low)
            .fold(f64::INFINITY, f64::min);
        bars[index].close < neckline && bars[index - 1].close >= neckline
    }
}

impl PatternDetector for DoubleExtremeDetector {
    fn name(&self) -> &str {
        "double_extreme"
    }

    fn warmup_bars(&self) -> usize {
        2 * self.pivot_width + self.min_separation + 2
    }

    fn detect(&self, bars: &[Bar], index: usize, _frame: &IndicatorFrame) -> Option<SignalKind> {
        if index >= bars.len() || index + 1 < self.warmup_bars() {
            return None;
        }
        if self.double_bottom(bars, index) {
            Some(SignalKind::DoubleBottom)
        } else if self.double_top(bars, index) {
            Some(SignalKind::DoubleTop)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    /// W shape: two troughs near 90 with a 100 neckline, then a breakout.
    fn w_shape(final_close: f64) -> Vec<Bar> {
        let closes = [
            100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 92.0, 95.0, 98.0, 99.0, 97.0, 94.0, 92.0, 90.5,
            92.0, 94.0, 96.0, 98.0, 99.0, final_close,
        ];
        let data: Vec<(f64, f64, f64, f64)> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let o = if i == 0 { c } else { closes[i - 1] };
                (o, o.max(c) + 0.5, o.min(c) - 0.5, c)
            })
            .collect();
        make_ohlc_bars(&data)
    }

    fn detector() -> DoubleExtremeDetector {
        DoubleExtremeDetector::new(&PatternParams::default())
    }

    #[test]
    fn breakout_through_neckline_is_double_bottom() {
        let bars = w_shape(101.0);
        let frame = IndicatorFrame::nan(bars.len());
        assert_eq!(
            detector().detect(&bars, bars.len() - 1, &frame),
            Some(SignalKind::DoubleBottom)
        );
    }

    #[test]
    fn no_signal_below_neckline() {
        let bars = w_shape(99.2);
        let frame = IndicatorFrame::nan(bars.len());
        assert_eq!(detector().detect(&bars, bars.len() - 1, &frame), None);
    }

    #[test]
    fn troughs_too_far_apart_in_price() {
        let mut bars = w_shape(101.0);
        // deepen the second trough by ~10%
        bars[13].low = 81.0;
        let frame = IndicatorFrame::nan(bars.len());
        assert_eq!(detector().detect(&bars, bars.len() - 1, &frame), None);
    }

    #[test]
    fn mirrored_shape_is_double_top() {
        let bars: Vec<Bar> = w_shape(101.0)
            .into_iter()
            .map(|b| Bar {
                open: 200.0 - b.open,
                high: 200.0 - b.low,
                low: 200.0 - b.high,
                close: 200.0 - b.close,
                ..b
            })
            .collect();
        let frame = IndicatorFrame::nan(bars.len());
        assert_eq!(
            detector().detect(&bars, bars.len() - 1, &frame),
            Some(SignalKind::DoubleTop)
        );
    }

    #[test]
    fn short_history_is_no_signal() {
        let bars = w_shape(101.0);
        let frame = IndicatorFrame::nan(bars.len());
        assert_eq!(detector().detect(&bars[..5], 4, &frame), None);
    }
}
