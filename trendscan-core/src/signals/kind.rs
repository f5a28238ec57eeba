//! The closed signal vocabulary and its static classification table.
//!
//! `SignalKind::spec` is the single source of truth for category, bias,
//! regime gate and default score. The match is exhaustive, so adding a kind
//! without classifying it does not compile.

use serde::{Deserialize, Serialize};

/// Scoring category. Exclusive categories count only their strongest signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Trend,
    Volume,
    Pattern,
    Oscillator,
    Fundamental,
    Timing,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Trend,
        Category::Volume,
        Category::Pattern,
        Category::Oscillator,
        Category::Fundamental,
        Category::Timing,
    ];

    /// Trend structure, chart patterns and oscillator alignment all restate
    /// the same underlying move; only one signal per category counts.
    pub fn is_exclusive(self) -> bool {
        matches!(self, Category::Trend | Category::Pattern | Category::Oscillator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
}

/// Regime under which a signal is suppressed (never inverted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateRule {
    Never,
    SuppressInTrend,
    SuppressInRange,
}

/// Static classification of one signal kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSpec {
    pub label: &'static str,
    pub category: Category,
    pub bias: Bias,
    pub gate: GateRule,
    pub default_score: f64,
}

/// Every signal the engine can emit.
///
/// Declaration order is the stable tie-break order for conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    // Trend structure
    MaBreakout,
    MaBreakdown,
    GoldenCross,
    DeathCross,
    BullishAlignment,
    BearishAlignment,
    SarFlipBullish,
    SarFlipBearish,
    CloudBreakout,
    CloudBreakdown,
    TenkanKijunBullishCross,
    TenkanKijunBearishCross,
    ChannelBreakout,
    ChannelBreakdown,
    StrongUptrend,
    StrongDowntrend,
    // Oscillators
    RsiOversold,
    RsiOverbought,
    WilliamsOversold,
    WilliamsOverbought,
    MacdBullishCross,
    MacdBearishCross,
    BullishDivergence,
    BearishDivergence,
    // Volume and money flow
    VolumeSurgeAccumulation,
    VolumeSurgeDistribution,
    VolumeAccumulation,
    VolumeDistribution,
    MfiOversold,
    MfiOverbought,
    BuyingPressure,
    SellingPressure,
    // Chart and candle patterns
    DoubleBottom,
    DoubleTop,
    BullishThreeBarReversal,
    BearishThreeBarReversal,
    PullbackToSupport,
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
    RangeBreakout,
    RangeBreakdown,
    // Exhaustion timing
    ExhaustionBuySetup,
    ExhaustionSellSetup,
    // Fundamentals and events
    HistoricallyCheap,
    NegativeEarnings,
    StrongRevenueGrowth,
    RevenueContraction,
    HighGrossMargin,
    FreeCashFlowRich,
    EarningsImminent,
}

const fn spec(
    label: &'static str,
    category: Category,
    bias: Bias,
    gate: GateRule,
    default_score: f64,
) -> SignalSpec {
    SignalSpec {
        label,
        category,
        bias,
        gate,
        default_score,
    }
}

impl SignalKind {
    pub const ALL: [SignalKind; 52] = [
        SignalKind::MaBreakout,
        SignalKind::MaBreakdown,
        SignalKind::GoldenCross,
        SignalKind::DeathCross,
        SignalKind::BullishAlignment,
        SignalKind::BearishAlignment,
        SignalKind::SarFlipBullish,
        SignalKind::SarFlipBearish,
        SignalKind::CloudBreakout,
        SignalKind::CloudBreakdown,
        SignalKind::TenkanKijunBullishCross,
        SignalKind::TenkanKijunBearishCross,
        SignalKind::ChannelBreakout,
        SignalKind::ChannelBreakdown,
        SignalKind::StrongUptrend,
        SignalKind::StrongDowntrend,
        SignalKind::RsiOversold,
        SignalKind::RsiOverbought,
        SignalKind::WilliamsOversold,
        SignalKind::WilliamsOverbought,
        SignalKind::MacdBullishCross,
        SignalKind::MacdBearishCross,
        SignalKind::BullishDivergence,
        SignalKind::BearishDivergence,
        SignalKind::VolumeSurgeAccumulation,
        SignalKind::VolumeSurgeDistribution,
        SignalKind::VolumeAccumulation,
        SignalKind::VolumeDistribution,
        SignalKind::MfiOversold,
        SignalKind::MfiOverbought,
        SignalKind::BuyingPressure,
        SignalKind::SellingPressure,
        SignalKind::DoubleBottom,
        SignalKind::DoubleTop,
        SignalKind::BullishThreeBarReversal,
        SignalKind::BearishThreeBarReversal,
        SignalKind::PullbackToSupport,
        SignalKind::Hammer,
        SignalKind::ShootingStar,
        SignalKind::BullishEngulfing,
        SignalKind::BearishEngulfing,
        SignalKind::RangeBreakout,
        SignalKind::RangeBreakdown,
        SignalKind::ExhaustionBuySetup,
        SignalKind::ExhaustionSellSetup,
        SignalKind::HistoricallyCheap,
        SignalKind::NegativeEarnings,
        SignalKind::StrongRevenueGrowth,
        SignalKind::RevenueContraction,
        SignalKind::HighGrossMargin,
        SignalKind::FreeCashFlowRich,
        SignalKind::EarningsImminent,
    ];

    pub fn spec(self) -> SignalSpec {
        use Bias::{Bearish, Bullish};
        use Category::{Fundamental, Oscillator, Pattern, Timing, Trend, Volume};
        use GateRule::{Never, SuppressInRange, SuppressInTrend};
        use SignalKind::*;
        match self {
            MaBreakout => spec("ma_breakout", Trend, Bullish, Never, 3.0),
            MaBreakdown => spec("ma_breakdown", Trend, Bearish, Never, -3.0),
            GoldenCross => spec("golden_cross", Trend, Bullish, Never, 2.0),
            DeathCross => spec("death_cross", Trend, Bearish, Never, -2.0),
            BullishAlignment => spec("bullish_alignment", Trend, Bullish, Never, 2.0),
            BearishAlignment => spec("bearish_alignment", Trend, Bearish, Never, -2.0),
            SarFlipBullish => spec("sar_flip_bullish", Trend, Bullish, SuppressInRange, 1.5),
            SarFlipBearish => spec("sar_flip_bearish", Trend, Bearish, SuppressInRange, -1.5),
            CloudBreakout => spec("cloud_breakout", Trend, Bullish, Never, 2.0),
            CloudBreakdown => spec("cloud_breakdown", Trend, Bearish, Never, -2.0),
            TenkanKijunBullishCross => spec("tenkan_kijun_bullish_cross", Trend, Bullish, Never, 1.0),
            TenkanKijunBearishCross => spec("tenkan_kijun_bearish_cross", Trend, Bearish, Never, -1.0),
            ChannelBreakout => spec("channel_breakout", Trend, Bullish, Never, 1.5),
            ChannelBreakdown => spec("channel_breakdown", Trend, Bearish, Never, -1.5),
            StrongUptrend => spec("strong_uptrend", Trend, Bullish, Never, 1.0),
            StrongDowntrend => spec("strong_downtrend", Trend, Bearish, Never, -1.0),

            RsiOversold => spec("rsi_oversold", Oscillator, Bullish, SuppressInTrend, 1.5),
            RsiOverbought => spec("rsi_overbought", Oscillator, Bearish, SuppressInTrend, -1.5),
            WilliamsOversold => spec("williams_oversold", Oscillator, Bullish, SuppressInTrend, 1.0),
            WilliamsOverbought => spec("williams_overbought", Oscillator, Bearish, SuppressInTrend, -1.0),
            MacdBullishCross => spec("macd_bullish_cross", Oscillator, Bullish, Never, 0.75),
            MacdBearishCross => spec("macd_bearish_cross", Oscillator, Bearish, Never, -0.75),
            BullishDivergence => spec("bullish_divergence", Oscillator, Bullish, Never, 2.0),
            BearishDivergence => spec("bearish_divergence", Oscillator, Bearish, Never, -2.0),

            VolumeSurgeAccumulation => spec("volume_surge_accumulation", Volume, Bullish, Never, 2.0),
            VolumeSurgeDistribution => spec("volume_surge_distribution", Volume, Bearish, Never, -2.0),
            VolumeAccumulation => spec("volume_accumulation", Volume, Bullish, Never, 1.0),
            VolumeDistribution => spec("volume_distribution", Volume, Bearish, Never, -1.0),
            MfiOversold => spec("mfi_oversold", Volume, Bullish, Never, 1.0),
            MfiOverbought => spec("mfi_overbought", Volume, Bearish, Never, -1.0),
            BuyingPressure => spec("buying_pressure", Volume, Bullish, Never, 1.0),
            SellingPressure => spec("selling_pressure", Volume, Bearish, Never, -1.0),

            DoubleBottom => spec("double_bottom", Pattern, Bullish, Never, 2.0),
            DoubleTop => spec("double_top", Pattern, Bearish, Never, -2.0),
            BullishThreeBarReversal => spec("bullish_three_bar_reversal", Pattern, Bullish, Never, 1.5),
            BearishThreeBarReversal => spec("bearish_three_bar_reversal", Pattern, Bearish, Never, -1.5),
            PullbackToSupport => spec("pullback_to_support", Pattern, Bullish, Never, 1.5),
            Hammer => spec("hammer", Pattern, Bullish, Never, 1.0),
            ShootingStar => spec("shooting_star", Pattern, Bearish, Never, -1.0),
            BullishEngulfing => spec("bullish_engulfing", Pattern, Bullish, Never, 1.5),
            BearishEngulfing => spec("bearish_engulfing", Pattern, Bearish, Never, -1.5),
            RangeBreakout => spec("range_breakout", Pattern, Bullish, Never, 2.0),
            RangeBreakdown => spec("range_breakdown", Pattern, Bearish, Never, -2.0),

            ExhaustionBuySetup => spec("exhaustion_buy_setup", Timing, Bullish, Never, 1.5),
            ExhaustionSellSetup => spec("exhaustion_sell_setup", Timing, Bearish, Never, -1.5),

            HistoricallyCheap => spec("historically_cheap", Fundamental, Bullish, Never, 1.5),
            NegativeEarnings => spec("negative_earnings", Fundamental, Bearish, Never, -1.0),
            StrongRevenueGrowth => spec("strong_revenue_growth", Fundamental, Bullish, Never, 1.5),
            RevenueContraction => spec("revenue_contraction", Fundamental, Bearish, Never, -1.0),
            HighGrossMargin => spec("high_gross_margin", Fundamental, Bullish, Never, 0.5),
            FreeCashFlowRich => spec("free_cash_flow_rich", Fundamental, Bullish, Never, 1.0),
            EarningsImminent => spec("earnings_imminent", Fundamental, Bearish, Never, -0.5),
        }
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn category(self) -> Category {
        self.spec().category
    }

    pub fn is_exclusive(self) -> bool {
        self.category().is_exclusive()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_is_complete_and_sorted() {
        // ALL must follow declaration order, which is also the Ord order.
        for pair in SignalKind::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{:?} before {:?}", pair[0], pair[1]);
        }
        assert_eq!(SignalKind::ALL[0], SignalKind::MaBreakout);
        assert_eq!(SignalKind::ALL[51], SignalKind::EarningsImminent);
    }

    #[test]
    fn labels_are_unique() {
        let labels: HashSet<&str> = SignalKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels.len(), SignalKind::ALL.len());
    }

    #[test]
    fn labels_match_serde_names() {
        for kind in SignalKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.label()));
            assert_eq!(SignalKind::from_label(kind.label()), Some(kind));
        }
    }

    #[test]
    fn default_scores_follow_bias() {
        for kind in SignalKind::ALL {
            let s = kind.spec();
            match s.bias {
                Bias::Bullish => assert!(s.default_score > 0.0, "{kind}"),
                Bias::Bearish => assert!(s.default_score < 0.0, "{kind}"),
            }
        }
    }

    #[test]
    fn exclusivity_comes_from_category() {
        assert!(SignalKind::BullishAlignment.is_exclusive());
        assert!(SignalKind::Hammer.is_exclusive());
        assert!(SignalKind::RsiOversold.is_exclusive());
        assert!(!SignalKind::MfiOversold.is_exclusive());
        assert!(!SignalKind::ExhaustionBuySetup.is_exclusive());
        assert!(!SignalKind::EarningsImminent.is_exclusive());
    }

    #[test]
    fn oscillator_bands_gate_in_trend_and_sar_in_range() {
        assert_eq!(SignalKind::RsiOverbought.spec().gate, GateRule::SuppressInTrend);
        assert_eq!(SignalKind::WilliamsOversold.spec().gate, GateRule::SuppressInTrend);
        assert_eq!(SignalKind::SarFlipBullish.spec().gate, GateRule::SuppressInRange);
        assert_eq!(SignalKind::MacdBullishCross.spec().gate, GateRule::Never);
    }
}
