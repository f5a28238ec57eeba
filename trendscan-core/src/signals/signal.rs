//! A scored signal instance.

use serde::Serialize;

use super::kind::{Category, SignalKind};
use crate::scoring::WeightTable;

/// One extracted signal with its classification and weight attached at
/// construction. Category and exclusivity always come from `SignalKind::spec`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub label: &'static str,
    pub category: Category,
    pub raw_score: f64,
    pub exclusive: bool,
}

impl Signal {
    pub fn scored(kind: SignalKind, weights: &WeightTable) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            label: spec.label,
            category: spec.category,
            raw_score: weights.score(kind),
            exclusive: spec.category.is_exclusive(),
        }
    }

    /// The same signal with its score zeroed, as reported when the regime gates it.
    pub fn gated(mut self) -> Self {
        self.raw_score = 0.0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_weight_from_table() {
        let weights = WeightTable::default().with_override(SignalKind::RangeBreakout, 2.75);
        let s = Signal::scored(SignalKind::RangeBreakout, &weights);
        assert_eq!(s.label, "range_breakout");
        assert_eq!(s.category, Category::Pattern);
        assert!(s.exclusive);
        assert_eq!(s.raw_score, 2.75);
    }

    #[test]
    fn gated_copy_keeps_classification() {
        let s = Signal::scored(SignalKind::RsiOversold, &WeightTable::default()).gated();
        assert_eq!(s.kind, SignalKind::RsiOversold);
        assert_eq!(s.raw_score, 0.0);
    }
}
