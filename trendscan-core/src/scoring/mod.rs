pub mod engine;
pub mod weights;

pub use engine::{ScoreReport, ScoringEngine, SuppressedSignal, SuppressionReason};
pub use weights::WeightTable;
