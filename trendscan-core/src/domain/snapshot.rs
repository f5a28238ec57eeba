//! Optional inputs supplied alongside the bar history: a live quote,
//! a fundamentals snapshot, and broad-market context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Bar;
use crate::components::indicator::Indicator;
use crate::indicators::Sma;

/// Intraday snapshot used to extend or overwrite the most recent bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveQuote {
    pub date: NaiveDate,
    pub price: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: u64,
    #[serde(default)]
    pub up_volume: Option<u64>,
    #[serde(default)]
    pub down_volume: Option<u64>,
}

impl LiveQuote {
    /// Share of up-volume in total classified volume, if both sides are known
    /// and non-zero in sum.
    pub fn up_volume_ratio(&self) -> Option<f64> {
        let up = self.up_volume? as f64;
        let down = self.down_volume? as f64;
        let total = up + down;
        if total <= 0.0 {
            return None;
        }
        Some(up / total)
    }

    fn is_usable(&self) -> bool {
        self.price.is_finite()
            && self.price > 0.0
            && self.day_high.is_finite()
            && self.day_low.is_finite()
    }
}

/// Overlay a live quote on a closed bar history.
///
/// - Same date as the last bar: close is replaced, high/low are widened,
///   volume takes the larger of the two.
/// - Later date: a new bar is appended, opening at the previous close.
/// - Earlier date, unusable quote, or empty history: bars are returned unchanged.
pub fn apply_live_quote(bars: &[Bar], quote: &LiveQuote) -> Vec<Bar> {
    let mut out = bars.to_vec();
    if !quote.is_usable() {
        return out;
    }
    let Some(last) = out.last_mut() else {
        return out;
    };

    if quote.date == last.date {
        last.close = quote.price;
        last.high = last.high.max(quote.day_high).max(quote.price);
        last.low = last.low.min(quote.day_low).min(quote.price);
        last.volume = last.volume.max(quote.volume);
    } else if quote.date > last.date {
        let open = last.close;
        out.push(Bar {
            date: quote.date,
            open,
            high: quote.day_high.max(quote.price).max(open),
            low: quote.day_low.min(quote.price).min(open),
            close: quote.price,
            volume: quote.volume,
        });
    }
    out
}

/// Fundamentals snapshot. Every field is optional; absent fields simply
/// produce no fundamental signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fundamentals {
    /// Trailing earnings per share.
    pub earnings_per_share: Option<f64>,
    /// Year-over-year revenue growth as a fraction (0.25 = 25%).
    pub revenue_growth: Option<f64>,
    /// Gross margin as a fraction.
    pub gross_margin: Option<f64>,
    /// Free cash flow yield as a fraction of market value.
    pub free_cash_flow_yield: Option<f64>,
    pub next_earnings_date: Option<NaiveDate>,
}

/// Broad index position relative to its long moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkTrend {
    AboveLongAverage,
    BelowLongAverage,
}

impl BenchmarkTrend {
    /// Derive the label from a benchmark bar series and its `period` SMA.
    ///
    /// Returns `None` when the series is too short for the average.
    pub fn from_bars(bars: &[Bar], period: usize) -> Option<Self> {
        let last = bars.last()?;
        let sma = Sma::new(period).compute(bars);
        let avg = *sma.last()?;
        if avg.is_nan() || last.close.is_nan() {
            return None;
        }
        if last.close >= avg {
            Some(Self::AboveLongAverage)
        } else {
            Some(Self::BelowLongAverage)
        }
    }
}

/// Optional broad-market inputs used for the Bull/Bear/Panic context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketInputs {
    pub benchmark_trend: Option<BenchmarkTrend>,
    /// Volatility gauge level (VIX-style index).
    pub volatility_gauge: Option<f64>,
}
