//! Domain types for trendscan.

pub mod bar;
pub mod snapshot;

pub use bar::Bar;
pub use snapshot::{apply_live_quote, BenchmarkTrend, Fundamentals, LiveQuote, MarketInputs};
