//! Range breakout / breakdown: the first close beyond the prior bar's
//! Donchian band.

use crate::components::detector::PatternDetector;
use crate::components::indicator::value_at;
use crate::domain::Bar;
use crate::indicators::IndicatorFrame;
use crate::signals::SignalKind;

#[derive(Debug, Clone)]
pub struct RangeBreakDetector {
    window: usize,
}

impl RangeBreakDetector {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl PatternDetector for RangeBreakDetector {
    fn name(&self) -> &str {
        "range_break"
    }

    fn warmup_bars(&self) -> usize {
        self.window + 2
    }

    fn detect(&self, bars: &[Bar], index: usize, frame: &IndicatorFrame) -> Option<SignalKind> {
        if index < 2 || index >= bars.len() {
            return None;
        }
        let (close, prev_close) = (bars[index].close, bars[index - 1].close);

        // Band as of the previous bar, so the current bar cannot move it.
        if let (Some(upper), Some(prev_upper)) = (
            value_at(&frame.donchian_upper, index - 1),
            value_at(&frame.donchian_upper, index - 2),
        ) {
            if close > upper && prev_close <= prev_upper {
                return Some(SignalKind::RangeBreakout);
            }
        }
        if let (Some(lower), Some(prev_lower)) = (
            value_at(&frame.donchian_lower, index - 1),
            value_at(&frame.donchian_lower, index - 2),
        ) {
            if close < lower && prev_close >= prev_lower {
                return Some(SignalKind::RangeBreakdown);
            }
        }
        None
    }
}
