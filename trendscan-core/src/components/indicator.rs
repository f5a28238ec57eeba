//! Indicator trait and NaN-aware series access.
//!
//! Every series is computed once per analysis into the `IndicatorFrame`;
//! rules and detectors then read it by bar index.

use crate::domain::Bar;

/// A derived numeric series over a bar history.
///
/// Output has one value per input bar. Values before `lookback()` are NaN,
/// and a NaN input taints the values that read it.
///
/// # No look-ahead
/// The value at bar t is a function of `bars[..=t]` only, so computing on a
/// truncated history reproduces the same prefix.
pub trait Indicator: Send + Sync {
    /// Stable identifier such as `rsi_14` or `donchian_upper_20`.
    fn name(&self) -> &str;

    /// Index of the first non-NaN output on clean data.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Read `series[index]`, treating out-of-range, NaN and infinite values as
/// "not applicable".
pub fn value_at(series: &[f64], index: usize) -> Option<f64> {
    series.get(index).copied().filter(|v| v.is_finite())
}

/// Read the value at `index` and the one before it.
pub fn pair_at(series: &[f64], index: usize) -> Option<(f64, f64)> {
    if index == 0 {
        return None;
    }
    Some((value_at(series, index - 1)?, value_at(series, index)?))
}
