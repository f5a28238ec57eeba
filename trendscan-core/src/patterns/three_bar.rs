//! Three-bar reversal: three bars of one color, then a bar of the other
//! color closing beyond the open of the bar three back.

use crate::components::detector::PatternDetector;
use crate::domain::Bar;
use crate::indicators::IndicatorFrame;
use crate::signals::SignalKind;

#[derive(Debug, Clone, Default)]
pub struct ThreeBarReversalDetector;

impl PatternDetector for ThreeBarReversalDetector {
    fn name(&self) -> &str {
        "three_bar_reversal"
    }

    fn warmup_bars(&self) -> usize {
        4
    }

    fn detect(&self, bars: &[Bar], index: usize, _frame: &IndicatorFrame) -> Option<SignalKind> {
        if index < 3 || index >= bars.len() {
            return None;
        }
        let run = &bars[index - 3..index];
        let last = &bars[index];
        if last.is_void() || run.iter().any(Bar::is_void) {
            return None;
        }
        let anchor = run[0].open;

        if run.iter().all(Bar::is_down) && last.is_up() && last.close > anchor {
            Some(SignalKind::BullishThreeBarReversal)
        } else if run.iter().all(Bar::is_up) && last.is_down() && last.close < anchor {
            Some(SignalKind::BearishThreeBarReversal)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    fn detect(data: &[(f64, f64, f64, f64)]) -> Option<SignalKind> {
        let bars = make_ohlc_bars(data);
        let frame = IndicatorFrame::nan(bars.len());
        ThreeBarReversalDetector.detect(&bars, bars.len() - 1, &frame)
    }

    #[test]
    fn bullish_reversal() {
        let data = [
            (20.0, 20.5, 18.5, 19.0),
            (19.0, 19.2, 17.8, 18.0),
            (18.0, 18.1, 16.5, 17.0),
            (17.0, 20.8, 16.9, 20.5),
        ];
        assert_eq!(detect(&data), Some(SignalKind::BullishThreeBarReversal));
    }

    #[test]
    fn needs_close_beyond_anchor_open() {
        let data = [
            (20.0, 20.5, 18.5, 19.0),
            (19.0, 19.2, 17.8, 18.0),
            (18.0, 18.1, 16.5, 17.0),
            (17.0, 19.8, 16.9, 19.5),
        ];
        assert_eq!(detect(&data), None);
    }

    #[test]
    fn bearish_reversal() {
        let data = [
            (10.0, 11.2, 9.9, 11.0),
            (11.0, 12.1, 10.9, 12.0),
            (12.0, 13.1, 11.9, 13.0),
            (13.0, 13.1, 9.5, 9.8),
        ];
        assert_eq!(detect(&data), Some(SignalKind::BearishThreeBarReversal));
    }

    #[test]
    fn mixed_run_is_no_signal() {
        let data = [
            (10.0, 11.2, 9.9, 11.0),
            (11.0, 11.1, 10.0, 10.5),
            (10.5, 13.1, 10.4, 13.0),
            (13.0, 13.1, 9.5, 9.8),
        ];
        assert_eq!(detect(&data), None);
    }

    #[test]
    fn too_few_bars() {
        let bars = make_ohlc_bars(&[(1.0, 1.0, 1.0, 1.0); 3]);
        let frame = IndicatorFrame::nan(3);
        assert_eq!(ThreeBarReversalDetector.detect(&bars, 2, &frame), None);
    }
}
