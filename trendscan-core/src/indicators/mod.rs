//! Concrete indicator implementations and the precomputed frame.
//!
//! Every indicator implements the `Indicator` trait from `components::indicator`.
//! `IndicatorFrame::compute` runs them all once per analysis; rules and
//! detectors read the frame by bar index and never recompute.
//!
//! Multi-line indicators (MACD, ADX, Ichimoku, Keltner) expose a line selector
//! for the single-series trait plus a method returning all lines at once.

pub mod adx;
pub mod atr;
pub mod donchian;
pub mod frame;
pub mod ichimoku;
pub mod keltner;
pub mod macd;
pub mod mfi;
pub mod moving_average;
pub mod parabolic_sar;
pub mod rsi;
pub mod series;
pub mod williams_r;

pub use adx::{Adx, AdxLine, DirectionalSeries};
pub use atr::{Atr, AtrPercent};
pub use donchian::Donchian;
pub use frame::IndicatorFrame;
pub use ichimoku::{Ichimoku, IchimokuLine, IchimokuLines};
pub use keltner::{Keltner, KeltnerBand, KeltnerBands};
pub use macd::{Macd, MacdLine};
pub use mfi::Mfi;
pub use moving_average::{Ema, Sma, Source};
pub use parabolic_sar::ParabolicSar;
pub use rsi::Rsi;
pub use williams_r::WilliamsR;

/// Synthetic bars from closes: open = previous close, high/low one point
/// outside the body, volume 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            test_bar(i, open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect()
}

/// Synthetic bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    data.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| test_bar(i, o, h, l, c))
        .collect()
}

#[cfg(test)]
fn test_bar(i: usize, open: f64, high: f64, low: f64, close: f64) -> crate::domain::Bar {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    crate::domain::Bar {
        date: base + chrono::Duration::days(i as i64),
        open,
        high,
        low,
        close,
        volume: 1000,
    }
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, epsilon={epsilon}"
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
