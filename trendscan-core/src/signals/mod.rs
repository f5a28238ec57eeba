//! Signal vocabulary, scored signal records and the extraction rules.

pub mod extract;
pub mod kind;
pub mod signal;

pub use extract::{extract_signals, RuleInputs};
pub use kind::{Bias, Category, GateRule, SignalKind, SignalSpec};
pub use signal::Signal;
