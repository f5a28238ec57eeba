//! Candle reversal shapes gated by RSI.
//!
//! Bottoming shapes count only while RSI is below the ceiling, topping shapes
//! only while it is above the floor. Without an RSI reading nothing fires.

use crate::components::detector::PatternDetector;
use crate::components::indicator::value_at;
use crate::config::PatternParams;
use crate::domain::Bar;
use crate::indicators::IndicatorFrame;
use crate::signals::SignalKind;

#[derive(Debug, Clone, Copy)]
struct RsiGate {
    bottoming_ceiling: f64,
    topping_floor: f64,
}

impl RsiGate {
    fn from_params(params: &PatternParams) -> Self {
        Self {
            bottoming_ceiling: params.bottoming_rsi_ceiling,
            topping_floor: params.topping_rsi_floor,
        }
    }

    fn allows(self, kind: SignalKind, rsi: f64) -> bool {
        match kind {
            SignalKind::Hammer | SignalKind::BullishEngulfing => rsi < self.bottoming_ceiling,
            _ => rsi > self.topping_floor,
        }
    }
}

/// Hammer and shooting star: a long wick on one side, little on the other.
#[derive(Debug, Clone)]
pub struct WickReversalDetector {
    wick_body_ratio: f64,
    opposite_wick_ratio: f64,
    gate: RsiGate,
}

impl WickReversalDetector {
    pub fn new(params: &PatternParams) -> Self {
        Self {
            wick_body_ratio: params.wick_body_ratio,
            opposite_wick_ratio: params.opposite_wick_ratio,
            gate: RsiGate::from_params(params),
        }
    }

    fn shape(&self, bar: &Bar) -> Option<SignalKind> {
        let body = bar.body();
        if bar.is_void() || body <= 0.0 {
            return None;
        }
        let (lower, upper) = (bar.lower_wick(), bar.upper_wick());
        if lower >= self.wick_body_ratio * body && upper <= self.opposite_wick_ratio * body {
            Some(SignalKind::Hammer)
        } else if upper >= self.wick_body_ratio * body && lower <= self.opposite_wick_ratio * body
        {
            Some(SignalKind::ShootingStar)
        } else {
            None
        }
    }
}

impl PatternDetector for WickReversalDetector {
    fn name(&self) -> &str {
        "wick_reversal"
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn detect(&self, bars: &[Bar], index: usize, frame: &IndicatorFrame) -> Option<SignalKind> {
        let kind = self.shape(bars.get(index)?)?;
        let rsi = value_at(&frame.rsi, index)?;
        self.gate.allows(kind, rsi).then_some(kind)
    }
}

/// Engulfing: the current body fully covers the previous, opposite-colored body.
#[derive(Debug, Clone)]
pub struct EngulfingDetector {
    gate: RsiGate,
}

impl EngulfingDetector {
    pub fn new(params: &PatternParams) -> Self {
        Self {
            gate: RsiGate::from_params(params),
        }
    }
}

impl PatternDetector for EngulfingDetector {
    fn name(&self) -> &str {
        "engulfing"
    }

    fn warmup_bars(&self) -> usize {
        2
    }

    fn detect(&self, bars: &[Bar], index: usize, frame: &IndicatorFrame) -> Option<SignalKind> {
        let curr = bars.get(index)?;
        let prev = bars.get(index.checked_sub(1)?)?;
        if curr.is_void() || prev.is_void() || curr.body() <= prev.body() {
            return None;
        }
        let kind = if prev.is_down()
            && curr.is_up()
            && curr.open <= prev.close
            && curr.close >= prev.open
        {
            SignalKind::BullishEngulfing
        } else if prev.is_up() && curr.is_down() && curr.open >= prev.close && curr.close <= prev.open
        {
            SignalKind::BearishEngulfing
        } else {
            return None;
        };
        let rsi = value_at(&frame.rsi, index)?;
        self.gate.allows(kind, rsi).then_some(kind)
    }
}
