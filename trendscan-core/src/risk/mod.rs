//! Stop placement and position sizing.

pub mod sizing;
pub mod stop;

pub use sizing::{position_size_pct, tier_risk_pct};
pub use stop::{stop_level, StopLevel, StopStance};

use serde::Serialize;

use crate::config::RiskParams;

/// Stop and size suggestion for the evaluated bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAdvice {
    pub stop_price: f64,
    pub stance: StopStance,
    /// Percent of capital. Always 0 with a reclaim level, since alerts are
    /// long-only. `None` when no valid size exists for the stop distance.
    pub position_size_pct: Option<f64>,
}

impl RiskAdvice {
    pub fn assess(price: f64, atr: f64, sar: f64, score: f64, params: &RiskParams) -> Option<Self> {
        let level = stop_level(price, atr, sar, params)?;
        let position_size_pct = match level.stance {
            StopStance::ProtectiveStop => position_size_pct(score, price, level.price, params),
            StopStance::ReclaimLevel => Some(0.0),
        };
        Some(Self {
            stop_price: level.price,
            stance: level.stance,
            position_size_pct,
        })
    }
}
