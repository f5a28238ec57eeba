//! TrendScan core: signal detection and scoring for daily price history.
//!
//! Pure and synchronous: bars (plus optional live quote, fundamentals and
//! market context) in, a scored, regime-filtered signal report with stop and
//! size advice out. No I/O, no shared mutable state.

pub mod analysis;
pub mod components;
pub mod config;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod patterns;
pub mod regime;
pub mod risk;
pub mod scoring;
pub mod signals;

pub use analysis::{AnalysisInput, AnalysisOutcome, AnalysisReport, Analyzer};
pub use config::EngineConfig;
pub use error::ConfigError;
