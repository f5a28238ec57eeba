//! Component traits.
//!
//! - Indicator: bar history in, numeric series out
//! - Pattern detector: bar history + indicator frame in, at most one signal out

pub mod detector;
pub mod indicator;

pub use detector::PatternDetector;
pub use indicator::{pair_at, value_at, Indicator};
