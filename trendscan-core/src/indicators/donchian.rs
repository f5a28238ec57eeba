//! Donchian channel: highest high and lowest low over `period` bars.
//! Lookback: period - 1.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::series::{rolling_max, rolling_min};

/// Channel edge: rolling max of highs or rolling min of lows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    High,
    Low,
}

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
    edge: Edge,
    name: String,
}

impl Donchian {
    /// Highest high; the breakout reference for range breaks.
    pub fn upper(period: usize) -> Self {
        Self::channel(period, Edge::High)
    }

    /// Lowest low; the breakdown reference.
    pub fn lower(period: usize) -> Self {
        Self::channel(period, Edge::Low)
    }

    fn channel(period: usize, edge: Edge) -> Self {
        assert!(period >= 1, "channel period must be >= 1");
        let side = match edge {
            Edge::High => "upper",
            Edge::Low => "lower",
        };
        Self {
            period,
            edge,
            name: format!("donchian_{side}_{period}"),
        }
    }
}

impl Indicator for Donchian {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        match self.edge {
            Edge::High => rolling_max(&bars.iter().map(|b| b.high).collect::<Vec<_>>(), self.period),
            Edge::Low => rolling_min(&bars.iter().map(|b| b.low).collect::<Vec<_>>(), self.period),
        }
    }
}
