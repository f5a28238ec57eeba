//! Conviction-tiered position sizing.
//!
//! # Formula
//! ```text
//! risk_pct      = tier for the score, capped at the risk ceiling
//! distance      = |price - stop| / price
//! position_pct  = min(risk_pct / distance, max_position_pct)
//! ```
//!
//! # Example
//! - Score 5.0 → 1.0% of capital at risk
//! - Price $100, stop $95 → distance 5%
//! - Position: 1.0 / 0.05 = 20% of capital

use crate::config::RiskParams;

/// Risk percent for the highest tier the score reaches, if any.
pub fn tier_risk_pct(score: f64, params: &RiskParams) -> Option<f64> {
    params
        .tiers
        .iter()
        .rev()
        .find(|tier| score >= tier.min_score)
        .map(|tier| tier.risk_pct.min(params.risk_ceiling_pct))
}

/// Suggested position as percent of capital.
///
/// `None` when the stop distance is not a positive finite number. `Some(0.0)`
/// when the score is below minimum conviction or below every tier.
pub fn position_size_pct(score: f64, price: f64, stop: f64, params: &RiskParams) -> Option<f64> {
    let distance = (price - stop).abs() / price;
    if !distance.is_finite() || distance <= 0.0 {
        return None;
    }
    if !score.is_finite() || score < params.min_conviction {
        return Some(0.0);
    }
    let Some(risk_pct) = tier_risk_pct(score, params) else {
        return Some(0.0);
    };
    Some((risk_pct / distance).clamp(0.0, params.max_position_pct))
}
