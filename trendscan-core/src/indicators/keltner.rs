//! Keltner channel: EMA of close ± multiplier × ATR.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::atr::Atr;
use super::series::{closes, ema_of_series};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeltnerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Keltner {
    ema_period: usize,
    atr_period: usize,
    multiplier: f64,
    band: KeltnerBand,
    name: String,
}

#[derive(Debug, Clone)]
pub struct KeltnerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl Keltner {
    pub fn new(ema_period: usize, atr_period: usize, multiplier: f64, band: KeltnerBand) -> Self {
        assert!(ema_period >= 1 && atr_period >= 1, "Keltner periods must be >= 1");
        let tag = match band {
            KeltnerBand::Upper => "upper",
            KeltnerBand::Middle => "middle",
            KeltnerBand::Lower => "lower",
        };
        Self {
            ema_period,
            atr_period,
            multiplier,
            band,
            name: format!("keltner_{tag}_{ema_period}_{atr_period}_{multiplier}"),
        }
    }

    pub fn bands(&self, bars: &[Bar]) -> KeltnerBands {
        let middle = ema_of_series(&closes(bars), self.ema_period);
        let atr = Atr::new(self.atr_period).compute(bars);
        let (upper, lower) = middle
            .iter()
            .zip(&atr)
            .map(|(m, a)| (m + self.multiplier * a, m - self.multiplier * a))
            .unzip();
        KeltnerBands {
            upper,
            middle,
            lower,
        }
    }
}

impl Indicator for Keltner {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.band {
            KeltnerBand::Middle => self.ema_period - 1,
            _ => (self.ema_period - 1).max(self.atr_period),
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let bands = self.bands(bars);
        match self.band {
            KeltnerBand::Upper => bands.upper,
            KeltnerBand::Middle => bands.middle,
            KeltnerBand::Lower => bands.lower,
        }
    }
}
