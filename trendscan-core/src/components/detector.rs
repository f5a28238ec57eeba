//! Pattern detector trait.
//!
//! Detectors look at closed bars (and the precomputed indicator frame) up to
//! and including `index` and return at most one signal kind. A detector that
//! lacks the history it needs returns `None`; it never panics.

use crate::domain::Bar;
use crate::indicators::IndicatorFrame;
use crate::signals::SignalKind;

/// Trait for chart-structure and candlestick detectors.
///
/// # Architecture invariant
/// The implementation must only use data from `bars[0..=index]`.
pub trait PatternDetector: Send + Sync {
    /// Human-readable name (e.g., "double_extreme").
    fn name(&self) -> &str;

    /// Number of bars required before the detector can evaluate.
    fn warmup_bars(&self) -> usize;

    fn detect(&self, bars: &[Bar], index: usize, frame: &IndicatorFrame) -> Option<SignalKind>;
}
