//! Volatility-anchored stop placement.
//!
//! # Formula
//! ```text
//! SAR below price (bullish):  stop    = max(sar * (1 - buffer), price - k * ATR)
//! SAR above price (bearish):  reclaim = min(sar * (1 + buffer), price + k * ATR)
//! ```
//! Taking the tighter of the two anchors keeps the stop on the correct side
//! of price: the bullish stop is always below it, the reclaim level above.

use serde::Serialize;

use crate::config::RiskParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopStance {
    /// Long-side protective stop below price.
    ProtectiveStop,
    /// Level price must reclaim before a long is considered.
    ReclaimLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopLevel {
    pub price: f64,
    pub stance: StopStance,
}

/// Returns `None` when ATR or SAR is unusable or SAR sits exactly on price.
pub fn stop_level(price: f64, atr: f64, sar: f64, params: &RiskParams) -> Option<StopLevel> {
    if !(price.is_finite() && price > 0.0 && atr.is_finite() && atr > 0.0 && sar.is_finite()) {
        return None;
    }
    let swing = params.atr_multiple * atr;

    let level = if sar < price {
        let stop = (sar * (1.0 - params.trend_buffer)).max(price - swing);
        StopLevel {
            price: stop,
            stance: StopStance::ProtectiveStop,
        }
    } else if sar > price {
        let reclaim = (sar * (1.0 + params.trend_buffer)).min(price + swing);
        StopLevel {
            price: reclaim,
            stance: StopStance::ReclaimLevel,
        }
    } else {
        return None;
    };

    let correct_side = match level.stance {
        StopStance::ProtectiveStop => level.price < price,
        StopStance::ReclaimLevel => level.price > price,
    };
    correct_side.then_some(level)
}
