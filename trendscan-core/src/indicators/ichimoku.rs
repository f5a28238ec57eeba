//! Ichimoku cloud.
//!
//! Tenkan and kijun are midpoints of the high/low range over a fast and a
//! medium window. Span A is the tenkan/kijun average, span B the midpoint over
//! the slow window; both are displayed `displacement` bars ahead.
//!
//! Spans are stored at the bar where they are displayed: `span_a[i]` is built
//! only from bars `..= i - displacement`. Reading the cloud at the evaluation
//! bar therefore never touches data past that bar.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::series::{rolling_max, rolling_min};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IchimokuLine {
    Tenkan,
    Kijun,
    SpanA,
    SpanB,
}

#[derive(Debug, Clone)]
pub struct Ichimoku {
    tenkan: usize,
    kijun: usize,
    senkou: usize,
    displacement: usize,
    line: IchimokuLine,
    name: String,
}

/// The four cloud lines, all aligned to display index.
#[derive(Debug, Clone)]
pub struct IchimokuLines {
    pub tenkan: Vec<f64>,
    pub kijun: Vec<f64>,
    pub span_a: Vec<f64>,
    pub span_b: Vec<f64>,
}

impl Ichimoku {
    pub fn new(
        tenkan: usize,
        kijun: usize,
        senkou: usize,
        displacement: usize,
        line: IchimokuLine,
    ) -> Self {
        assert!(
            tenkan >= 1 && kijun >= 1 && senkou >= 1,
            "Ichimoku windows must be >= 1"
        );
        let tag = match line {
            IchimokuLine::Tenkan => "tenkan",
            IchimokuLine::Kijun => "kijun",
            IchimokuLine::SpanA => "span_a",
            IchimokuLine::SpanB => "span_b",
        };
        Self {
            tenkan,
            kijun,
            senkou,
            displacement,
            line,
            name: format!("ichimoku_{tag}_{tenkan}_{kijun}_{senkou}"),
        }
    }

    /// Standard 9/26/52 cloud displaced 26 bars.
    pub fn standard(line: IchimokuLine) -> Self {
        Self::new(9, 26, 52, 26, line)
    }

    pub fn lines(&self, bars: &[Bar]) -> IchimokuLines {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let tenkan = midpoint(&highs, &lows, self.tenkan);
        let kijun = midpoint(&highs, &lows, self.kijun);
        let slow = midpoint(&highs, &lows, self.senkou);

        let n = bars.len();
        let mut span_a = vec![f64::NAN; n];
        let mut span_b = vec![f64::NAN; n];
        for i in self.displacement..n {
            let src = i - self.displacement;
            span_a[i] = (tenkan[src] + kijun[src]) / 2.0;
            span_b[i] = slow[src];
        }
        IchimokuLines {
            tenkan,
            kijun,
            span_a,
            span_b,
        }
    }
}

fn midpoint(highs: &[f64], lows: &[f64], period: usize) -> Vec<f64> {
    let hh = rolling_max(highs, period);
    let ll = rolling_min(lows, period);
    hh.iter().zip(&ll).map(|(h, l)| (h + l) / 2.0).collect()
}

impl Indicator for Ichimoku {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            IchimokuLine::Tenkan => self.tenkan - 1,
            IchimokuLine::Kijun => self.kijun - 1,
            IchimokuLine::SpanA => self.tenkan.max(self.kijun) - 1 + self.displacement,
            IchimokuLine::SpanB => self.senkou - 1 + self.displacement,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let lines = self.lines(bars);
        match self.line {
            IchimokuLine::Tenkan => lines.tenkan,
            IchimokuLine::Kijun => lines.kijun,
            IchimokuLine::SpanA => lines.span_a,
            IchimokuLine::SpanB => lines.span_b,
        }
    }
}
