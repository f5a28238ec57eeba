//! Scoring engine: regime gating, then within-category conflict resolution,
//! then an additive total.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::trace;

use super::weights::WeightTable;
use crate::regime::{RegimeAssessment, RegimeLabel};
use crate::signals::{Category, Signal, SignalKind};

/// Why a signal did not count toward the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SuppressionReason {
    /// The signal's gate matched the current regime.
    RegimeGated { regime: RegimeLabel },
    /// A stronger (or earlier, on ties) signal in the same exclusive category won.
    CategoryConflict { winner: SignalKind },
}

/// A signal left out of the total. Regime-gated entries carry a zero score;
/// conflict losers keep their weight so the comparison stays visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuppressedSignal {
    pub signal: Signal,
    pub reason: SuppressionReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    /// Sum of active scores plus the baseline offset.
    pub total_score: f64,
    pub baseline_offset: f64,
    pub active: Vec<Signal>,
    pub suppressed: Vec<SuppressedSignal>,
}

impl ScoreReport {
    pub fn is_active(&self, kind: SignalKind) -> bool {
        self.active.iter().any(|s| s.kind == kind)
    }

    pub fn suppression(&self, kind: SignalKind) -> Option<SuppressionReason> {
        self.suppressed
            .iter()
            .find(|s| s.signal.kind == kind)
            .map(|s| s.reason)
    }

    /// Active score contributed by one category.
    pub fn category_score(&self, category: Category) -> f64 {
        self.active
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.raw_score)
            .sum()
    }
}

/// Stateless apart from the injected weight table.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: WeightTable,
}

impl ScoringEngine {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Score a set of fired kinds. Duplicates collapse; order of `kinds` does
    /// not matter because evaluation follows `SignalKind` order.
    pub fn score(&self, kinds: &[SignalKind], regime: &RegimeAssessment) -> ScoreReport {
        let ordered: BTreeSet<SignalKind> = kinds.iter().copied().collect();
        let mut suppressed = Vec::new();
        let mut eligible = Vec::with_capacity(ordered.len());

        for kind in ordered {
            let signal = Signal::scored(kind, &self.weights);
            if regime.label.gates(kind.spec().gate) {
                trace!(signal = signal.label, regime = ?regime.label, "regime gated");
                suppressed.push(SuppressedSignal {
                    signal: signal.gated(),
                    reason: SuppressionReason::RegimeGated {
                        regime: regime.label,
                    },
                });
            } else {
                eligible.push(signal);
            }
        }

        let mut active = Vec::with_capacity(eligible.len());
        for category in Category::ALL {
            let members = eligible.iter().filter(|s| s.category == category);
            if !category.is_exclusive() {
                active.extend(members.cloned());
                continue;
            }
            let Some(winner) = strongest(members.clone()) else {
                continue;
            };
            for signal in members {
                if signal.kind == winner.kind {
                    active.push(signal.clone());
                } else {
                    trace!(signal = signal.label, winner = winner.label, "category conflict");
                    suppressed.push(SuppressedSignal {
                        signal: signal.clone(),
                        reason: SuppressionReason::CategoryConflict {
                            winner: winner.kind,
                        },
                    });
                }
            }
        }

        active.sort_by_key(|s| s.kind);
        suppressed.sort_by_key(|s| s.signal.kind);
        let signal_sum: f64 = active.iter().map(|s| s.raw_score).sum();
        ScoreReport {
            total_score: signal_sum + regime.baseline_offset,
            baseline_offset: regime.baseline_offset,
            active,
            suppressed,
        }
    }
}

/// Largest absolute score; the first in `SignalKind` order wins ties.
fn strongest<'a>(signals: impl Iterator<Item = &'a Signal>) -> Option<&'a Signal> {
    signals.fold(None::<&'a Signal>, |best, s| match best {
        Some(b) if s.raw_score.abs() <= b.raw_score.abs() => Some(b),
        _ => Some(s),
    })
}
