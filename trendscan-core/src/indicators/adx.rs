//! ADX: Average Directional Index (Wilder), with the +DI / -DI lines.
//!
//! +DM/-DM and TR are Wilder-smoothed over `period`, giving +DI and -DI.
//! DX = 100 * |+DI - -DI| / (+DI + -DI), and ADX is DX Wilder-smoothed again.
//! Lookback: period for the DI lines, 2 * period - 1 for ADX.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::series::{true_range, wilder_smooth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxLine {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    line: AdxLine,
    name: String,
}

/// All three directional series computed together.
#[derive(Debug, Clone)]
pub struct DirectionalSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self::with_line(period, AdxLine::Adx)
    }

    pub fn with_line(period: usize, line: AdxLine) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        let name = match line {
            AdxLine::Adx => format!("adx_{period}"),
            AdxLine::PlusDi => format!("plus_di_{period}"),
            AdxLine::MinusDi => format!("minus_di_{period}"),
        };
        Self { period, line, name }
    }

    pub fn directional(&self, bars: &[Bar]) -> DirectionalSeries {
        let n = bars.len();
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];
        for i in 1..n {
            let up = bars[i].high - bars[i - 1].high;
            let down = bars[i - 1].low - bars[i].low;
            if up.is_nan() || down.is_nan() {
                continue;
            }
            plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
            minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
        }

        let tr = wilder_smooth(&true_range(bars), self.period);
        let plus = wilder_smooth(&plus_dm, self.period);
        let minus = wilder_smooth(&minus_dm, self.period);

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            if tr[i].is_nan() || plus[i].is_nan() || minus[i].is_nan() || tr[i] <= 0.0 {
                continue;
            }
            let p = 100.0 * plus[i] / tr[i];
            let m = 100.0 * minus[i] / tr[i];
            plus_di[i] = p;
            minus_di[i] = m;
            dx[i] = if p + m == 0.0 {
                0.0
            } else {
                100.0 * (p - m).abs() / (p + m)
            };
        }

        DirectionalSeries {
            adx: wilder_smooth(&dx, self.period),
            plus_di,
            minus_di,
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            AdxLine::Adx => 2 * self.period - 1,
            AdxLine::PlusDi | AdxLine::MinusDi => self.period,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let series = self.directional(bars);
        match self.line {
            AdxLine::Adx => series.adx,
            AdxLine::PlusDi => series.plus_di,
            AdxLine::MinusDi => series.minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    fn trending(n: usize, step: f64) -> Vec<Bar> {
        let data: Vec<_> = (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * step;
                (base, base + 1.0, base - 1.0, base + step * 0.5)
            })
            .collect();
        make_ohlc_bars(&data)
    }

    #[test]
    fn adx_is_bounded() {
        let bars = make_ohlc_bars(&[
            (20.0, 21.0, 19.0, 20.5),
            (20.5, 22.0, 20.0, 21.5),
            (21.5, 21.8, 19.5, 19.8),
            (19.8, 20.5, 18.9, 20.2),
            (20.2, 22.5, 20.0, 22.0),
            (22.0, 23.0, 21.0, 21.2),
            (21.2, 21.5, 19.0, 19.5),
            (19.5, 20.0, 18.0, 18.5),
        ]);
        for v in Adx::new(3).compute(&bars).into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v), "ADX out of bounds: {v}");
        }
    }

    #[test]
    fn uptrend_has_plus_di_dominant_and_high_adx() {
        let bars = trending(40, 2.0);
        let series = Adx::new(7).directional(&bars);
        let last = bars.len() - 1;
        assert!(series.plus_di[last] > series.minus_di[last]);
        assert!(series.adx[last] > 50.0, "adx = {}", series.adx[last]);
    }

    #[test]
    fn downtrend_has_minus_di_dominant() {
        let bars = trending(40, -2.0);
        let series = Adx::new(7).directional(&bars);
        let last = bars.len() - 1;
        assert!(series.minus_di[last] > series.plus_di[last]);
    }

    #[test]
    fn constant_range_has_zero_adx() {
        let data: Vec<_> = (0..30).map(|_| (50.0, 51.0, 49.0, 50.0)).collect();
        let bars = make_ohlc_bars(&data);
        let adx = Adx::new(5).compute(&bars);
        assert_eq!(adx[29], 0.0);
    }

    #[test]
    fn adx_lookback() {
        let bars = trending(30, 1.0);
        let adx = Adx::new(5);
        let out = adx.compute(&bars);
        assert_eq!(adx.lookback(), 9);
        assert!(out[8].is_nan());
        assert!(!out[9].is_nan());
        assert_eq!(Adx::with_line(5, AdxLine::PlusDi).lookback(), 5);
    }
}
