//! Pullback to support: the bar dips to the short moving average from above
//! without closing below it while the medium average is still rising.

use crate::components::detector::PatternDetector;
use crate::components::indicator::{pair_at, value_at};
use crate::domain::Bar;
use crate::indicators::IndicatorFrame;
use crate::signals::SignalKind;

#[derive(Debug, Clone)]
pub struct PullbackDetector {
    medium_window: usize,
    slope_lookback: usize,
}

impl PullbackDetector {
    pub fn new(medium_window: usize, slope_lookback: usize) -> Self {
        Self {
            medium_window,
            slope_lookback,
        }
    }
}

impl PatternDetector for PullbackDetector {
    fn name(&self) -> &str {
        "pullback_to_support"
    }

    fn warmup_bars(&self) -> usize {
        self.medium_window + self.slope_lookback
    }

    fn detect(&self, bars: &[Bar], index: usize, frame: &IndicatorFrame) -> Option<SignalKind> {
        let bar = bars.get(index)?;
        let prev = bars.get(index.checked_sub(1)?)?;
        let (support_prev, support) = pair_at(&frame.sma_short, index)?;
        let trend_now = value_at(&frame.sma_medium, index)?;
        let trend_then = value_at(&frame.sma_medium, index.checked_sub(self.slope_lookback)?)?;

        let touched = bar.low <= support && bar.close >= support;
        let came_from_above = prev.close > support_prev;
        let trend_up = trend_now > trend_then && bar.close > trend_now;

        (touched && came_from_above && trend_up).then_some(SignalKind::PullbackToSupport)
    }
}
