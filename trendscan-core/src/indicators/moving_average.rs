//! Simple and exponential moving averages.
//!
//! SMA lookback: period - 1. EMA is seeded with the SMA of the first
//! `period` values, so its lookback is also period - 1.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::series::{closes, ema_of_series, rolling_mean, volumes};

/// Which bar field a moving average is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Close,
    Volume,
}

impl Source {
    fn extract(self, bars: &[Bar]) -> Vec<f64> {
        match self {
            Source::Close => closes(bars),
            Source::Volume => volumes(bars),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    source: Source,
    name: String,
}

impl Sma {
    /// SMA of closes.
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source: Source::Close,
            name: format!("sma_{period}"),
        }
    }

    /// SMA of volume, the rolling volume baseline.
    pub fn volume(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            source: Source::Volume,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_mean(&self.source.extract(bars), self.period)
    }
}

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.period)
    }
}
