//! Chart-structure and candlestick detectors.
//!
//! Each detector returns at most one signal kind per bar. Detectors that
//! lack history return nothing rather than failing.

pub mod candles;
pub mod double_extreme;
pub mod pullback;
pub mod range_break;
pub mod three_bar;

pub use candles::{EngulfingDetector, WickReversalDetector};
pub use double_extreme::DoubleExtremeDetector;
pub use pullback::PullbackDetector;
pub use range_break::RangeBreakDetector;
pub use three_bar::ThreeBarReversalDetector;

use crate::components::detector::PatternDetector;
use crate::config::{IndicatorParams, PatternParams};
use crate::domain::Bar;
use crate::indicators::IndicatorFrame;
use crate::signals::SignalKind;

/// The full detector set, built from configuration.
pub fn standard_detectors(
    indicators: &IndicatorParams,
    patterns: &PatternParams,
) -> Vec<Box<dyn PatternDetector>> {
    vec![
        Box::new(DoubleExtremeDetector::new(patterns)),
        Box::new(ThreeBarReversalDetector),
        Box::new(PullbackDetector::new(
            indicators.sma_medium,
            patterns.trend_slope_lookback,
        )),
        Box::new(WickReversalDetector::new(patterns)),
        Box::new(EngulfingDetector::new(patterns)),
        Box::new(RangeBreakDetector::new(indicators.donchian_period)),
    ]
}

/// Run every detector at `index`, skipping those still warming up.
pub fn detect_all(
    detectors: &[Box<dyn PatternDetector>],
    bars: &[Bar],
    index: usize,
    frame: &IndicatorFrame,
) -> Vec<SignalKind> {
    detectors
        .iter()
        .filter(|d| index + 1 >= d.warmup_bars())
        .filter_map(|d| d.detect(bars, index, frame))
        .collect()
}
