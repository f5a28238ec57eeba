//! IndicatorFrame: every derived series for one analysis, computed once.

use crate::components::indicator::Indicator;
use crate::config::IndicatorParams;
use crate::domain::Bar;

use super::{
    Adx, AtrPercent, Atr, Donchian, Ichimoku, IchimokuLine, Keltner, KeltnerBand, Macd,
    MacdLine, Mfi, ParabolicSar, Rsi, Sma, WilliamsR,
};

/// Typed per-bar indicator table. All vectors have the length of the bar
/// slice the frame was computed from; NaN marks warm-up or degenerate input.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub sma_short: Vec<f64>,
    pub sma_medium: Vec<f64>,
    pub sma_long: Vec<f64>,
    pub macd_line: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub psar: Vec<f64>,
    pub tenkan: Vec<f64>,
    pub kijun: Vec<f64>,
    pub span_a: Vec<f64>,
    pub span_b: Vec<f64>,
    pub mfi: Vec<f64>,
    pub rsi: Vec<f64>,
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub williams_r: Vec<f64>,
    pub keltner_upper: Vec<f64>,
    pub keltner_lower: Vec<f64>,
    pub atr: Vec<f64>,
    pub atr_pct: Vec<f64>,
    pub volume_ma: Vec<f64>,
    pub donchian_upper: Vec<f64>,
    pub donchian_lower: Vec<f64>,
}

impl IndicatorFrame {
    pub fn compute(bars: &[Bar], p: &IndicatorParams) -> Self {
        let (macd_line, macd_signal) =
            Macd::new(p.macd_fast, p.macd_slow, p.macd_signal, MacdLine::Macd).lines(bars);
        let directional = Adx::new(p.adx_period).directional(bars);
        let cloud = Ichimoku::new(
            p.ichimoku_tenkan,
            p.ichimoku_kijun,
            p.ichimoku_senkou,
            p.ichimoku_displacement,
            IchimokuLine::SpanA,
        )
        .lines(bars);
        let keltner = Keltner::new(
            p.keltner_ema,
            p.keltner_atr,
            p.keltner_multiplier,
            KeltnerBand::Middle,
        )
        .bands(bars);

        Self {
            sma_short: Sma::new(p.sma_short).compute(bars),
            sma_medium: Sma::new(p.sma_medium).compute(bars),
            sma_long: Sma::new(p.sma_long).compute(bars),
            macd_line,
            macd_signal,
            psar: ParabolicSar::new(p.sar_af_start, p.sar_af_step, p.sar_af_max).compute(bars),
            tenkan: cloud.tenkan,
            kijun: cloud.kijun,
            span_a: cloud.span_a,
            span_b: cloud.span_b,
            mfi: Mfi::new(p.mfi_period).compute(bars),
            rsi: Rsi::new(p.rsi_period).compute(bars),
            adx: directional.adx,
            plus_di: directional.plus_di,
            minus_di: directional.minus_di,
            williams_r: WilliamsR::new(p.williams_period).compute(bars),
            keltner_upper: keltner.upper,
            keltner_lower: keltner.lower,
            atr: Atr::new(p.atr_period).compute(bars),
            atr_pct: AtrPercent::new(p.atr_period).compute(bars),
            volume_ma: Sma::volume(p.volume_period).compute(bars),
            donchian_upper: Donchian::upper(p.donchian_period).compute(bars),
            donchian_lower: Donchian::lower(p.donchian_period).compute(bars),
        }
    }

    /// Number of bars the frame covers.
    pub fn len(&self) -> usize {
        self.atr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atr.is_empty()
    }

    /// All-NaN frame for rule tests that fill in only the series they read.
    #[cfg(test)]
    pub(crate) fn nan(len: usize) -> Self {
        let v = vec![f64::NAN; len];
        Self {
            sma_short: v.clone(),
            sma_medium: v.clone(),
            sma_long: v.clone(),
            macd_line: v.clone(),
            macd_signal: v.clone(),
            psar: v.clone(),
            tenkan: v.clone(),
            kijun: v.clone(),
            span_a: v.clone(),
            span_b: v.clone(),
            mfi: v.clone(),
            rsi: v.clone(),
            adx: v.clone(),
            plus_di: v.clone(),
            minus_di: v.clone(),
            williams_r: v.clone(),
            keltner_upper: v.clone(),
            keltner_lower: v.clone(),
            atr: v.clone(),
            atr_pct: v.clone(),
            volume_ma: v.clone(),
            donchian_upper: v.clone(),
            donchian_lower: v,
        }
    }
}
