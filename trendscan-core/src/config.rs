//! Engine configuration: every window, band, offset and weight in one
//! serializable object.
//!
//! Missing keys fall back to defaults, so a TOML file only needs the values
//! it changes:
//!
//! ```toml
//! min_bars = 120
//!
//! [regime]
//! trend_adx = 22.0
//!
//! [weights]
//! version = "aggressive-2"
//! [weights.overrides]
//! ma_breakout = 4.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scoring::WeightTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Floor on the history length an analysis requires.
    pub min_bars: usize,
    pub indicators: IndicatorParams,
    pub thresholds: SignalThresholds,
    pub patterns: PatternParams,
    pub regime: RegimeParams,
    pub risk: RiskParams,
    pub weights: WeightTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_bars: 100,
            indicators: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
            patterns: PatternParams::default(),
            regime: RegimeParams::default(),
            risk: RiskParams::default(),
            weights: WeightTable::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Bars required before an analysis is attempted.
    ///
    /// The long moving average is not part of this: with fewer bars than its
    /// window, the signals that read it are simply not applicable.
    pub fn min_history(&self) -> usize {
        let p = &self.indicators;
        [
            p.ichimoku_senkou + p.ichimoku_displacement,
            2 * p.adx_period,
            p.macd_slow + p.macd_signal,
            p.volume_period + 1,
            self.patterns.extremum_lookback,
            self.min_bars,
        ]
        .into_iter()
        .max()
        .unwrap_or(self.min_bars)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bars < 2 {
            return Err(ConfigError::invalid("min_bars", "must be at least 2"));
        }
        self.indicators.validate()?;
        self.thresholds.validate()?;
        self.patterns.validate()?;
        self.regime.validate()?;
        self.risk.validate()?;
        self.weights.validate()
    }
}

fn positive(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(field, "must be > 0"));
    }
    Ok(())
}

fn ordered(field: &'static str, low: f64, high: f64) -> Result<(), ConfigError> {
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(ConfigError::invalid(
            field,
            format!("lower band {low} must be below upper band {high}"),
        ));
    }
    Ok(())
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= min && value <= max) {
        return Err(ConfigError::invalid(
            field,
            format!("{value} is outside [{min}, {max}]"),
        ));
    }
    Ok(())
}

/// Indicator windows and multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_medium: usize,
    pub sma_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub sar_af_start: f64,
    pub sar_af_step: f64,
    pub sar_af_max: f64,
    pub ichimoku_tenkan: usize,
    pub ichimoku_kijun: usize,
    pub ichimoku_senkou: usize,
    pub ichimoku_displacement: usize,
    pub mfi_period: usize,
    pub rsi_period: usize,
    pub adx_period: usize,
    pub williams_period: usize,
    pub keltner_ema: usize,
    pub keltner_atr: usize,
    pub keltner_multiplier: f64,
    pub atr_period: usize,
    pub volume_period: usize,
    pub donchian_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_medium: 50,
            sma_long: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sar_af_start: 0.02,
            sar_af_step: 0.02,
            sar_af_max: 0.20,
            ichimoku_tenkan: 9,
            ichimoku_kijun: 26,
            ichimoku_senkou: 52,
            ichimoku_displacement: 26,
            mfi_period: 14,
            rsi_period: 14,
            adx_period: 14,
            williams_period: 14,
            keltner_ema: 20,
            keltner_atr: 10,
            keltner_multiplier: 2.0,
            atr_period: 14,
            volume_period: 20,
            donchian_period: 20,
        }
    }
}

impl IndicatorParams {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("indicators.sma_short", self.sma_short),
            ("indicators.sma_medium", self.sma_medium),
            ("indicators.sma_long", self.sma_long),
            ("indicators.macd_fast", self.macd_fast),
            ("indicators.macd_signal", self.macd_signal),
            ("indicators.ichimoku_tenkan", self.ichimoku_tenkan),
            ("indicators.ichimoku_kijun", self.ichimoku_kijun),
            ("indicators.ichimoku_senkou", self.ichimoku_senkou),
            ("indicators.mfi_period", self.mfi_period),
            ("indicators.rsi_period", self.rsi_period),
            ("indicators.adx_period", self.adx_period),
            ("indicators.williams_period", self.williams_period),
            ("indicators.keltner_ema", self.keltner_ema),
            ("indicators.keltner_atr", self.keltner_atr),
            ("indicators.atr_period", self.atr_period),
            ("indicators.volume_period", self.volume_period),
            ("indicators.donchian_period", self.donchian_period),
        ] {
            positive(field, value)?;
        }
        if !(self.sma_short < self.sma_medium && self.sma_medium < self.sma_long) {
            return Err(ConfigError::invalid(
                "indicators.sma_*",
                "windows must be strictly increasing short < medium < long",
            ));
        }
        if self.macd_slow <= self.macd_fast {
            return Err(ConfigError::invalid(
                "indicators.macd_slow",
                "must exceed macd_fast",
            ));
        }
        if !(self.sar_af_start > 0.0 && self.sar_af_step > 0.0) {
            return Err(ConfigError::invalid(
                "indicators.sar_af_start",
                "acceleration factors must be > 0",
            ));
        }
        if !(self.sar_af_max >= self.sar_af_start && self.sar_af_max <= 1.0) {
            return Err(ConfigError::invalid(
                "indicators.sar_af_max",
                "must lie between sar_af_start and 1.0",
            ));
        }
        if !(self.keltner_multiplier.is_finite() && self.keltner_multiplier > 0.0) {
            return Err(ConfigError::invalid(
                "indicators.keltner_multiplier",
                "must be > 0",
            ));
        }
        Ok(())
    }
}

/// Bands, tiers and cut-offs used by the signal rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub williams_oversold: f64,
    pub williams_overbought: f64,
    pub mfi_oversold: f64,
    pub mfi_overbought: f64,
    /// ADX level at which a directional trend counts as strong.
    pub strong_trend_adx: f64,
    pub volume_surge_ratio: f64,
    pub volume_elevated_ratio: f64,
    /// Up-volume share of a live quote that counts as buying pressure.
    pub buying_pressure_ratio: f64,
    pub selling_pressure_ratio: f64,
    pub divergence_lookback: usize,
    pub exhaustion_run: usize,
    pub exhaustion_offset: usize,
    pub cheap_pe: f64,
    pub strong_growth: f64,
    pub high_gross_margin: f64,
    pub rich_fcf_yield: f64,
    pub earnings_window_days: i64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            williams_oversold: -80.0,
            williams_overbought: -20.0,
            mfi_oversold: 20.0,
            mfi_overbought: 80.0,
            strong_trend_adx: 40.0,
            volume_surge_ratio: 2.0,
            volume_elevated_ratio: 1.5,
            buying_pressure_ratio: 0.65,
            selling_pressure_ratio: 0.35,
            divergence_lookback: 20,
            exhaustion_run: 9,
            exhaustion_offset: 4,
            cheap_pe: 15.0,
            strong_growth: 0.20,
            high_gross_margin: 0.50,
            rich_fcf_yield: 0.05,
            earnings_window_days: 7,
        }
    }
}

impl SignalThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        ordered("thresholds.rsi", self.rsi_oversold, self.rsi_overbought)?;
        within("thresholds.rsi_oversold", self.rsi_oversold, 0.0, 100.0)?;
        within("thresholds.rsi_overbought", self.rsi_overbought, 0.0, 100.0)?;
        ordered("thresholds.williams", self.williams_oversold, self.williams_overbought)?;
        within("thresholds.williams_oversold", self.williams_oversold, -100.0, 0.0)?;
        within("thresholds.williams_overbought", self.williams_overbought, -100.0, 0.0)?;
        ordered("thresholds.mfi", self.mfi_oversold, self.mfi_overbought)?;
        within("thresholds.mfi_oversold", self.mfi_oversold, 0.0, 100.0)?;
        within("thresholds.mfi_overbought", self.mfi_overbought, 0.0, 100.0)?;
        within("thresholds.strong_trend_adx", self.strong_trend_adx, 0.0, 100.0)?;
        ordered(
            "thresholds.volume_ratios",
            self.volume_elevated_ratio,
            self.volume_surge_ratio,
        )?;
        if self.volume_elevated_ratio <= 1.0 {
            return Err(ConfigError::invalid(
                "thresholds.volume_elevated_ratio",
                "must exceed 1.0",
            ));
        }
        ordered(
            "thresholds.pressure_ratios",
            self.selling_pressure_ratio,
            self.buying_pressure_ratio,
        )?;
        within("thresholds.buying_pressure_ratio", self.buying_pressure_ratio, 0.0, 1.0)?;
        within("thresholds.selling_pressure_ratio", self.selling_pressure_ratio, 0.0, 1.0)?;
        positive("thresholds.divergence_lookback", self.divergence_lookback)?;
        positive("thresholds.exhaustion_run", self.exhaustion_run)?;
        positive("thresholds.exhaustion_offset", self.exhaustion_offset)?;
        if !(self.cheap_pe.is_finite() && self.cheap_pe > 0.0) {
            return Err(ConfigError::invalid("thresholds.cheap_pe", "must be > 0"));
        }
        if self.earnings_window_days < 0 {
            return Err(ConfigError::invalid(
                "thresholds.earnings_window_days",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Chart-structure and candle-shape parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    /// Window searched for the two extrema of a double bottom/top.
    pub extremum_lookback: usize,
    /// Max relative difference between the two extrema.
    pub extremum_tolerance: f64,
    /// Bars on each side a pivot must dominate.
    pub pivot_width: usize,
    pub min_separation: usize,
    /// Dominant wick must be at least this multiple of the body.
    pub wick_body_ratio: f64,
    /// Opposite wick may be at most this multiple of the body.
    pub opposite_wick_ratio: f64,
    /// Bottoming shapes count only while RSI is below this ceiling.
    pub bottoming_rsi_ceiling: f64,
    /// Topping shapes count only while RSI is above this floor.
    pub topping_rsi_floor: f64,
    pub trend_slope_lookback: usize,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            extremum_lookback: 60,
            extremum_tolerance: 0.03,
            pivot_width: 3,
            min_separation: 5,
            wick_body_ratio: 2.0,
            opposite_wick_ratio: 0.5,
            bottoming_rsi_ceiling: 60.0,
            topping_rsi_floor: 40.0,
            trend_slope_lookback: 10,
        }
    }
}

impl PatternParams {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("patterns.pivot_width", self.pivot_width)?;
        positive("patterns.min_separation", self.min_separation)?;
        positive("patterns.trend_slope_lookback", self.trend_slope_lookback)?;
        if self.extremum_lookback < 2 * self.pivot_width + self.min_separation {
            return Err(ConfigError::invalid(
                "patterns.extremum_lookback",
                "too short to hold two separated pivots",
            ));
        }
        if !(self.extremum_tolerance > 0.0 && self.extremum_tolerance < 1.0) {
            return Err(ConfigError::invalid(
                "patterns.extremum_tolerance",
                "must lie in (0, 1)",
            ));
        }
        if !(self.wick_body_ratio.is_finite() && self.wick_body_ratio > 0.0) {
            return Err(ConfigError::invalid("patterns.wick_body_ratio", "must be > 0"));
        }
        within("patterns.opposite_wick_ratio", self.opposite_wick_ratio, 0.0, f64::MAX)?;
        within("patterns.bottoming_rsi_ceiling", self.bottoming_rsi_ceiling, 0.0, 100.0)?;
        within("patterns.topping_rsi_floor", self.topping_rsi_floor, 0.0, 100.0)
    }
}

/// Trend/range threshold and market-context bands and offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeParams {
    /// ADX at or above this is a trending market.
    pub trend_adx: f64,
    /// Volatility gauge at or above this is a panic.
    pub panic_gauge: f64,
    /// Volatility gauge at or above this reads as bearish when no benchmark
    /// trend is supplied.
    pub elevated_gauge: f64,
    pub bull_offset: f64,
    pub bear_offset: f64,
    pub panic_offset: f64,
}

impl Default for RegimeParams {
    fn default() -> Self {
        Self {
            trend_adx: 25.0,
            panic_gauge: 30.0,
            elevated_gauge: 25.0,
            bull_offset: 0.5,
            bear_offset: -1.0,
            panic_offset: -2.0,
        }
    }
}

impl RegimeParams {
    fn validate(&self) -> Result<(), ConfigError> {
        within("regime.trend_adx", self.trend_adx, 0.0, 100.0)?;
        if !(self.elevated_gauge.is_finite() && self.elevated_gauge <= self.panic_gauge) {
            return Err(ConfigError::invalid(
                "regime.elevated_gauge",
                "must not exceed panic_gauge",
            ));
        }
        for (field, value) in [
            ("regime.bull_offset", self.bull_offset),
            ("regime.bear_offset", self.bear_offset),
            ("regime.panic_offset", self.panic_offset),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be finite"));
            }
        }
        Ok(())
    }
}

/// Score threshold mapped to the fraction of capital put at risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvictionTier {
    pub min_score: f64,
    /// Percent of capital risked between entry and stop.
    pub risk_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// Stop distance in ATRs.
    pub atr_multiple: f64,
    /// Fractional buffer applied beyond the SAR line.
    pub trend_buffer: f64,
    pub risk_ceiling_pct: f64,
    pub max_position_pct: f64,
    /// Total score below which no position is suggested.
    pub min_conviction: f64,
    /// Ascending by `min_score`. Kept last so it serializes after the scalars.
    pub tiers: Vec<ConvictionTier>,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            atr_multiple: 2.5,
            trend_buffer: 0.005,
            risk_ceiling_pct: 2.0,
            max_position_pct: 40.0,
            min_conviction: 2.0,
            tiers: vec![
                ConvictionTier { min_score: 2.0, risk_pct: 0.5 },
                ConvictionTier { min_score: 4.0, risk_pct: 1.0 },
                ConvictionTier { min_score: 6.0, risk_pct: 1.5 },
                ConvictionTier { min_score: 8.0, risk_pct: 2.0 },
            ],
        }
    }
}

impl RiskParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.atr_multiple.is_finite() && self.atr_multiple > 0.0) {
            return Err(ConfigError::invalid("risk.atr_multiple", "must be > 0"));
        }
        within("risk.trend_buffer", self.trend_buffer, 0.0, 0.5)?;
        within("risk.risk_ceiling_pct", self.risk_ceiling_pct, 0.0, 100.0)?;
        within("risk.max_position_pct", self.max_position_pct, 0.0, 100.0)?;
        if !(self.min_conviction.is_finite() && self.min_conviction >= 0.0) {
            return Err(ConfigError::invalid("risk.min_conviction", "must be >= 0"));
        }
        if self.tiers.is_empty() {
            return Err(ConfigError::invalid("risk.tiers", "at least one tier is required"));
        }
        for pair in self.tiers.windows(2) {
            if pair[1].min_score <= pair[0].min_score {
                return Err(ConfigError::invalid(
                    "risk.tiers",
                    "min_score must be strictly ascending",
                ));
            }
        }
        for tier in &self.tiers {
            if !(tier.risk_pct > 0.0 && tier.risk_pct <= self.risk_ceiling_pct) {
                return Err(ConfigError::invalid(
                    "risk.tiers",
                    format!(
                        "risk_pct {} must lie in (0, {}]",
                        tier.risk_pct, self.risk_ceiling_pct
                    ),
                ));
            }
            if !tier.min_score.is_finite() {
                return Err(ConfigError::invalid("risk.tiers", "min_score must be finite"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SignalKind;

    #[test]
    fn defaults_validate() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.min_history(), 100);
    }

    #[test]
    fn min_history_tracks_longest_window() {
        let mut config = EngineConfig::default();
        config.indicators.ichimoku_senkou = 104;
        assert_eq!(config.min_history(), 130);
        config.min_bars = 250;
        assert_eq!(config.min_history(), 250);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let text = r#"
            min_bars = 120

            [regime]
            trend_adx = 22.0

            [weights]
            version = "aggressive-2"

            [weights.overrides]
            ma_breakout = 4.0
        "#;
        let config = EngineConfig::from_toml_str(text).unwrap();
        assert_eq!(config.min_bars, 120);
        assert_eq!(config.regime.trend_adx, 22.0);
        assert_eq!(config.regime.panic_gauge, 30.0);
        assert_eq!(config.indicators, IndicatorParams::default());
        assert_eq!(config.weights.score(SignalKind::MaBreakout), 4.0);
        assert_eq!(config.weights.score(SignalKind::GoldenCross), 2.0);
    }

    #[test]
    fn toml_round_trip() {
        let config = EngineConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_inverted_bands() {
        let mut config = EngineConfig::default();
        config.thresholds.rsi_oversold = 75.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_zero_windows() {
        let mut config = EngineConfig::default();
        config.indicators.rsi_period = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_tier_above_ceiling() {
        let mut config = EngineConfig::default();
        config.risk.tiers.push(ConvictionTier { min_score: 10.0, risk_pct: 3.0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_wrong_polarity_weight() {
        let text = r#"
            [weights.overrides]
            death_cross = 1.0
        "#;
        assert!(matches!(
            EngineConfig::from_toml_str(text),
            Err(ConfigError::Polarity { kind: SignalKind::DeathCross, .. })
        ));
    }

    #[test]
    fn parse_errors_surface() {
        assert!(matches!(
            EngineConfig::from_toml_str("min_bars = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/trendscan.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
