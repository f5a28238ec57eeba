//! MACD: fast EMA minus slow EMA, with an EMA signal line.
//!
//! Lookback: (slow - 1) for the MACD line, (slow - 1) + (signal - 1) for
//! the signal line.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::series::{closes, ema_of_series};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "MACD slow period must exceed fast period");
        let suffix = match line {
            MacdLine::Macd => "line",
            MacdLine::Signal => "signal",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("macd_{suffix}_{fast}_{slow}_{signal}"),
        }
    }

    /// Both lines in one pass.
    pub fn lines(&self, bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
        let c = closes(bars);
        let fast = ema_of_series(&c, self.fast);
        let slow = ema_of_series(&c, self.slow);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&macd, self.signal);
        (macd, signal)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.slow - 1,
            MacdLine::Signal => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let (macd, signal) = self.lines(bars);
        match self.line {
            MacdLine::Macd => macd,
            MacdLine::Signal => signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn rising_prices_give_positive_macd() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let out = Macd::new(12, 26, 9, MacdLine::Macd).compute(&bars);
        assert!(out[24].is_nan());
        assert!(out[25] > 0.0);
        assert!(out[59] > 0.0);
    }

    #[test]
    fn signal_line_warmup() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.3).sin()).collect();
        let bars = make_bars(&closes);
        let macd = Macd::new(12, 26, 9, MacdLine::Signal);
        let out = macd.compute(&bars);
        assert_eq!(macd.lookback(), 33);
        assert!(out[32].is_nan());
        assert!(!out[33].is_nan());
    }

    #[test]
    #[should_panic]
    fn slow_must_exceed_fast() {
        Macd::new(26, 12, 9, MacdLine::Macd);
    }
}
