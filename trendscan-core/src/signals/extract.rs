//! Rule-based signal extraction from the indicator frame.
//!
//! Rules read the current and previous bar only (plus fixed lookbacks for
//! divergence and the run counter). A NaN anywhere a rule reads means the
//! rule is not applicable and emits nothing.

use chrono::NaiveDate;

use super::kind::SignalKind;
use crate::components::indicator::{pair_at, value_at};
use crate::config::SignalThresholds;
use crate::domain::{Bar, Fundamentals, LiveQuote};
use crate::indicators::IndicatorFrame;

/// Optional collaborator inputs a rule pass may read.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleInputs<'a> {
    pub live_quote: Option<&'a LiveQuote>,
    pub fundamentals: Option<&'a Fundamentals>,
}

/// Every rule-based signal firing at `index`.
pub fn extract_signals(
    bars: &[Bar],
    index: usize,
    frame: &IndicatorFrame,
    thresholds: &SignalThresholds,
    inputs: RuleInputs<'_>,
) -> Vec<SignalKind> {
    let Some(bar) = bars.get(index) else {
        return Vec::new();
    };
    let closes: Vec<f64> = bars[..=index].iter().map(|b| b.close).collect();

    let mut out = Vec::new();
    trend_rules(&closes, index, frame, thresholds, &mut out);
    oscillator_rules(&closes, index, frame, thresholds, &mut out);
    volume_rules(bars, index, frame, thresholds, &mut out);
    out.extend(exhaustion_setup(
        &closes,
        thresholds.exhaustion_run,
        thresholds.exhaustion_offset,
    ));
    if let Some(quote) = inputs.live_quote.filter(|q| q.date == bar.date) {
        out.extend(pressure_signal(quote, thresholds));
    }
    if let Some(f) = inputs.fundamentals {
        out.extend(fundamental_signals(f, bar.close, bar.date, thresholds));
    }
    out
}

/// `a` moved from at-or-below `b` to strictly above it.
fn crossed_above(prev_a: f64, prev_b: f64, a: f64, b: f64) -> bool {
    prev_a <= prev_b && a > b
}

fn crossed_below(prev_a: f64, prev_b: f64, a: f64, b: f64) -> bool {
    prev_a >= prev_b && a < b
}

/// Emit `up` or `down` when series `a` crosses series `b` at `index`.
fn cross(a: &[f64], b: &[f64], index: usize, up: SignalKind, down: SignalKind) -> Option<SignalKind> {
    let (pa, ca) = pair_at(a, index)?;
    let (pb, cb) = pair_at(b, index)?;
    if crossed_above(pa, pb, ca, cb) {
        Some(up)
    } else if crossed_below(pa, pb, ca, cb) {
        Some(down)
    } else {
        None
    }
}

fn trend_rules(
    closes: &[f64],
    index: usize,
    f: &IndicatorFrame,
    t: &SignalThresholds,
    out: &mut Vec<SignalKind>,
) {
    use SignalKind::*;

    out.extend(cross(closes, &f.sma_long, index, MaBreakout, MaBreakdown));
    out.extend(cross(&f.sma_medium, &f.sma_long, index, GoldenCross, DeathCross));
    out.extend(alignment(closes, index, f));
    // SAR sits on the other side of price after a flip.
    out.extend(cross(closes, &f.psar, index, SarFlipBullish, SarFlipBearish));
    out.extend(cloud_break(closes, index, f));
    out.extend(cross(
        &f.tenkan,
        &f.kijun,
        index,
        TenkanKijunBullishCross,
        TenkanKijunBearishCross,
    ));
    if let Some((pc, c)) = pair_at(closes, index) {
        if let Some((pu, u)) = pair_at(&f.keltner_upper, index) {
            if crossed_above(pc, pu, c, u) {
                out.push(ChannelBreakout);
            }
        }
        if let Some((pl, l)) = pair_at(&f.keltner_lower, index) {
            if crossed_below(pc, pl, c, l) {
                out.push(ChannelBreakdown);
            }
        }
    }
    if let (Some(adx), Some(plus), Some(minus)) = (
        value_at(&f.adx, index),
        value_at(&f.plus_di, index),
        value_at(&f.minus_di, index),
    ) {
        if adx >= t.strong_trend_adx && plus > minus {
            out.push(StrongUptrend);
        } else if adx >= t.strong_trend_adx && minus > plus {
            out.push(StrongDowntrend);
        }
    }
}

/// Price stacked above short > medium > long averages, or the reverse.
fn alignment(closes: &[f64], index: usize, f: &IndicatorFrame) -> Option<SignalKind> {
    let c = value_at(closes, index)?;
    let s = value_at(&f.sma_short, index)?;
    let m = value_at(&f.sma_medium, index)?;
    let l = value_at(&f.sma_long, index)?;
    if c > s && s > m && m > l {
        Some(SignalKind::BullishAlignment)
    } else if c < s && s < m && m < l {
        Some(SignalKind::BearishAlignment)
    } else {
        None
    }
}

/// Close leaving the cloud. The spans are already stored at display index,
/// so reading them at `index` uses only data up to `index - displacement`.
fn cloud_break(closes: &[f64], index: usize, f: &IndicatorFrame) -> Option<SignalKind> {
    let (pc, c) = pair_at(closes, index)?;
    let (pa, a) = pair_at(&f.span_a, index)?;
    let (pb, b) = pair_at(&f.span_b, index)?;
    if crossed_above(pc, pa.max(pb), c, a.max(b)) {
        Some(SignalKind::CloudBreakout)
    } else if crossed_below(pc, pa.min(pb), c, a.min(b)) {
        Some(SignalKind::CloudBreakdown)
    } else {
        None
    }
}

fn oscillator_rules(
    closes: &[f64],
    index: usize,
    f: &IndicatorFrame,
    t: &SignalThresholds,
    out: &mut Vec<SignalKind>,
) {
    use SignalKind::*;

    if let Some(rsi) = value_at(&f.rsi, index) {
        if rsi <= t.rsi_oversold {
            out.push(RsiOversold);
        } else if rsi >= t.rsi_overbought {
            out.push(RsiOverbought);
        }
    }
    if let Some(wr) = value_at(&f.williams_r, index) {
        if wr <= t.williams_oversold {
            out.push(WilliamsOversold);
        } else if wr >= t.williams_overbought {
            out.push(WilliamsOverbought);
        }
    }
    out.extend(cross(
        &f.macd_line,
        &f.macd_signal,
        index,
        MacdBullishCross,
        MacdBearishCross,
    ));
    out.extend(divergence(closes, &f.rsi, index, t.divergence_lookback));
}

/// Price sets a new extreme against the prior window while the oscillator
/// fails to exceed its own prior extreme.
pub fn divergence(
    prices: &[f64],
    oscillator: &[f64],
    index: usize,
    lookback: usize,
) -> Option<SignalKind> {
    let start = index.checked_sub(lookback)?;
    let price = value_at(prices, index)?;
    let osc = value_at(oscillator, index)?;
    let prior_prices = prices.get(start..index)?;
    let prior_osc = oscillator.get(start..index)?;
    if prior_prices
        .iter()
        .chain(prior_osc)
        .any(|v| !v.is_finite())
    {
        return None;
    }

    let max = |s: &[f64]| s.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = |s: &[f64]| s.iter().copied().fold(f64::INFINITY, f64::min);

    if price > max(prior_prices) && osc < max(prior_osc) {
        Some(SignalKind::BearishDivergence)
    } else if price < min(prior_prices) && osc > min(prior_osc) {
        Some(SignalKind::BullishDivergence)
    } else {
        None
    }
}

fn volume_rules(
    bars: &[Bar],
    index: usize,
    f: &IndicatorFrame,
    t: &SignalThresholds,
    out: &mut Vec<SignalKind>,
) {
    use SignalKind::*;

    out.extend(relative_volume(bars, index, &f.volume_ma, t));
    if let Some(mfi) = value_at(&f.mfi, index) {
        if mfi <= t.mfi_oversold {
            out.push(MfiOversold);
        } else if mfi >= t.mfi_overbought {
            out.push(MfiOverbought);
        }
    }
}

/// Current volume against the baseline as of the previous bar, framed by the
/// bar's direction. Only the highest tier reached fires.
fn relative_volume(
    bars: &[Bar],
    index: usize,
    volume_ma: &[f64],
    t: &SignalThresholds,
) -> Option<SignalKind> {
    let baseline = value_at(volume_ma, index.checked_sub(1)?)?;
    if baseline <= 0.0 {
        return None;
    }
    let bar = &bars[index];
    let ratio = bar.volume as f64 / baseline;

    let rising = if bar.is_up() {
        true
    } else if bar.is_down() {
        false
    } else {
        let prev = bars[index - 1].close;
        if bar.close == prev || bar.close.is_nan() || prev.is_nan() {
            return None;
        }
        bar.close > prev
    };

    let kind = match (ratio >= t.volume_surge_ratio, ratio >= t.volume_elevated_ratio, rising) {
        (true, _, true) => SignalKind::VolumeSurgeAccumulation,
        (true, _, false) => SignalKind::VolumeSurgeDistribution,
        (false, true, true) => SignalKind::VolumeAccumulation,
        (false, true, false) => SignalKind::VolumeDistribution,
        (false, false, _) => return None,
    };
    Some(kind)
}

/// Fires only when exactly `run` consecutive closes sit below (buy setup) or
/// above (sell setup) the close `offset` bars earlier.
pub fn exhaustion_setup(closes: &[f64], run: usize, offset: usize) -> Option<SignalKind> {
    let count = |below: bool| -> usize {
        let mut n = 0;
        for i in (offset..closes.len()).rev() {
            let (c, ref_c) = (closes[i], closes[i - offset]);
            let hit = if below { c < ref_c } else { c > ref_c };
            if !hit {
                break;
            }
            n += 1;
            if n > run {
                break;
            }
        }
        n
    };
    if count(true) == run {
        Some(SignalKind::ExhaustionBuySetup)
    } else if count(false) == run {
        Some(SignalKind::ExhaustionSellSetup)
    } else {
        None
    }
}

fn pressure_signal(quote: &LiveQuote, t: &SignalThresholds) -> Option<SignalKind> {
    let ratio = quote.up_volume_ratio()?;
    if ratio >= t.buying_pressure_ratio {
        Some(SignalKind::BuyingPressure)
    } else if ratio <= t.selling_pressure_ratio {
        Some(SignalKind::SellingPressure)
    } else {
        None
    }
}

/// Fundamental and event flags. Absent or non-finite fields emit nothing.
pub fn fundamental_signals(
    f: &Fundamentals,
    price: f64,
    as_of: NaiveDate,
    t: &SignalThresholds,
) -> Vec<SignalKind> {
    use SignalKind::*;

    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    let mut out = Vec::new();

    if let Some(eps) = finite(f.earnings_per_share) {
        if eps <= 0.0 {
            out.push(NegativeEarnings);
        } else if price.is_finite() && price > 0.0 && price / eps <= t.cheap_pe {
            out.push(HistoricallyCheap);
        }
    }
    if let Some(growth) = finite(f.revenue_growth) {
        if growth >= t.strong_growth {
            out.push(StrongRevenueGrowth);
        } else if growth < 0.0 {
            out.push(RevenueContraction);
        }
    }
    if finite(f.gross_margin).is_some_and(|m| m >= t.high_gross_margin) {
        out.push(HighGrossMargin);
    }
    if finite(f.free_cash_flow_yield).is_some_and(|y| y >= t.rich_fcf_yield) {
        out.push(FreeCashFlowRich);
    }
    if let Some(date) = f.next_earnings_date {
        let days = (date - as_of).num_days();
        if (0..=t.earnings_window_days).contains(&days) {
            out.push(EarningsImminent);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn thresholds() -> SignalThresholds {
        SignalThresholds::default()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn crossing_needs_both_sides() {
        let a = [1.0, 3.0];
        let b = [2.0, 2.0];
        let up = cross(&a, &b, 1, SignalKind::GoldenCross, SignalKind::DeathCross);
        assert_eq!(up, Some(SignalKind::GoldenCross));
        let flat = cross(&b, &b, 1, SignalKind::GoldenCross, SignalKind::DeathCross);
        assert_eq!(flat, None);
        let nan = cross(&[f64::NAN, 3.0], &b, 1, SignalKind::GoldenCross, SignalKind::DeathCross);
        assert_eq!(nan, None);
    }

    #[test]
    fn price_crossing_long_average_is_breakout() {
        let bars = make_bars(&[99.0, 101.0]);
        let mut frame = IndicatorFrame::nan(2);
        frame.sma_long = vec![100.0, 100.0];
        let out = extract_signals(&bars, 1, &frame, &thresholds(), RuleInputs::default());
        assert_eq!(out, vec![SignalKind::MaBreakout]);
    }

    #[test]
    fn alignment_requires_full_stack() {
        let mut frame = IndicatorFrame::nan(1);
        frame.sma_short = vec![105.0];
        frame.sma_medium = vec![100.0];
        frame.sma_long = vec![95.0];
        assert_eq!(alignment(&[110.0], 0, &frame), Some(SignalKind::BullishAlignment));
        frame.sma_medium = vec![90.0];
        assert_eq!(alignment(&[110.0], 0, &frame), None);
    }

    #[test]
    fn sar_flip_follows_side_change() {
        let bars = make_bars(&[50.0, 52.0]);
        let mut frame = IndicatorFrame::nan(2);
        frame.psar = vec![51.0, 49.0];
        let out = extract_signals(&bars, 1, &frame, &thresholds(), RuleInputs::default());
        assert!(out.contains(&SignalKind::SarFlipBullish));
    }

    #[test]
    fn cloud_breakout_uses_upper_span() {
        let mut frame = IndicatorFrame::nan(2);
        frame.span_a = vec![101.0, 101.0];
        frame.span_b = vec![99.0, 99.0];
        assert_eq!(cloud_break(&[100.5, 101.5], 1, &frame), Some(SignalKind::CloudBreakout));
        assert_eq!(cloud_break(&[100.5, 100.8], 1, &frame), None);
        assert_eq!(cloud_break(&[99.5, 98.5], 1, &frame), Some(SignalKind::CloudBreakdown));
    }

    #[test]
    fn strong_trend_needs_direction() {
        let bars = make_bars(&[10.0, 10.0]);
        let mut frame = IndicatorFrame::nan(2);
        frame.adx = vec![45.0, 45.0];
        frame.plus_di = vec![30.0, 30.0];
        frame.minus_di = vec![12.0, 12.0];
        let out = extract_signals(&bars, 1, &frame, &thresholds(), RuleInputs::default());
        assert!(out.contains(&SignalKind::StrongUptrend));

        frame.adx = vec![35.0, 35.0];
        let out = extract_signals(&bars, 1, &frame, &thresholds(), RuleInputs::default());
        assert!(!out.contains(&SignalKind::StrongUptrend));
    }

    #[test]
    fn oscillator_bands() {
        let bars = make_bars(&[10.0, 10.0]);
        let mut frame = IndicatorFrame::nan(2);
        frame.rsi = vec![50.0, 25.0];
        frame.williams_r = vec![-50.0, -10.0];
        let out = extract_signals(&bars, 1, &frame, &thresholds(), RuleInputs::default());
        assert!(out.contains(&SignalKind::RsiOversold));
        assert!(out.contains(&SignalKind::WilliamsOverbought));
    }

    #[test]
    fn bearish_divergence_on_new_high_with_weaker_oscillator() {
        let prices = [10.0, 12.0, 11.0, 11.5, 12.5];
        let osc = [50.0, 75.0, 60.0, 62.0, 68.0];
        assert_eq!(divergence(&prices, &osc, 4, 4), Some(SignalKind::BearishDivergence));
        let confirming = [50.0, 75.0, 60.0, 62.0, 80.0];
        assert_eq!(divergence(&prices, &confirming, 4, 4), None);
    }

    #[test]
    fn bullish_divergence_on_new_low_with_stronger_oscillator() {
        let prices = [12.0, 10.0, 11.0, 10.5, 9.5];
        let osc = [50.0, 22.0, 40.0, 35.0, 30.0];
        assert_eq!(divergence(&prices, &osc, 4, 4), Some(SignalKind::BullishDivergence));
    }

    #[test]
    fn divergence_needs_full_window() {
        let prices = [10.0, 12.0, 13.0];
        let osc = [f64::NAN, 70.0, 60.0];
        assert_eq!(divergence(&prices, &osc, 2, 2), None);
        assert_eq!(divergence(&prices, &osc, 2, 5), None);
    }

    #[test]
    fn volume_tiers_pick_the_highest() {
        let mut bars = make_bars(&[10.0, 11.0]);
        let mut frame = IndicatorFrame::nan(2);
        frame.volume_ma = vec![1000.0, 1000.0];
        bars[1].volume = 2500;
        assert_eq!(
            relative_volume(&bars, 1, &frame.volume_ma, &thresholds()),
            Some(SignalKind::VolumeSurgeAccumulation)
        );
        bars[1].volume = 1600;
        assert_eq!(
            relative_volume(&bars, 1, &frame.volume_ma, &thresholds()),
            Some(SignalKind::VolumeAccumulation)
        );
        bars[1].volume = 1200;
        assert_eq!(relative_volume(&bars, 1, &frame.volume_ma, &thresholds()), None);
    }

    #[test]
    fn heavy_volume_on_down_bar_is_distribution() {
        let mut bars = make_bars(&[11.0, 10.0]);
        bars[1].volume = 3000;
        let ma = vec![1000.0, 1000.0];
        assert_eq!(
            relative_volume(&bars, 1, &ma, &thresholds()),
            Some(SignalKind::VolumeSurgeDistribution)
        );
    }

    #[test]
    fn zero_baseline_is_skipped() {
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[1].volume = 5000;
        assert_eq!(relative_volume(&bars, 1, &[0.0, 0.0], &thresholds()), None);
        assert_eq!(relative_volume(&bars, 1, &[f64::NAN, 1.0], &thresholds()), None);
    }

    #[test]
    fn exhaustion_fires_only_on_exact_run() {
        // 4 flat closes then a steady decline: close[i] < close[i - 4] from i = 4 on.
        let mut closes = vec![100.0; 4];
        closes.extend((1..=9).map(|k| 100.0 - k as f64));
        assert_eq!(exhaustion_setup(&closes, 9, 4), Some(SignalKind::ExhaustionBuySetup));

        closes.push(90.0);
        assert_eq!(exhaustion_setup(&closes, 9, 4), None);

        let rising: Vec<f64> = (0..13).map(|k| k as f64).collect();
        assert_eq!(exhaustion_setup(&rising, 9, 4), Some(SignalKind::ExhaustionSellSetup));
    }

    #[test]
    fn pressure_from_live_quote() {
        let quote = LiveQuote {
            date: date(4),
            price: 10.0,
            day_high: 10.5,
            day_low: 9.5,
            volume: 1000,
            up_volume: Some(700),
            down_volume: Some(300),
        };
        assert_eq!(pressure_signal(&quote, &thresholds()), Some(SignalKind::BuyingPressure));
        let sell = LiveQuote {
            up_volume: Some(200),
            down_volume: Some(800),
            ..quote.clone()
        };
        assert_eq!(pressure_signal(&sell, &thresholds()), Some(SignalKind::SellingPressure));
        let unknown = LiveQuote {
            up_volume: None,
            ..quote
        };
        assert_eq!(pressure_signal(&unknown, &thresholds()), None);
    }

    #[test]
    fn cheap_requires_positive_earnings() {
        let f = Fundamentals {
            earnings_per_share: Some(-0.5),
            ..Default::default()
        };
        let out = fundamental_signals(&f, 5.0, date(1), &thresholds());
        assert_eq!(out, vec![SignalKind::NegativeEarnings]);

        let f = Fundamentals {
            earnings_per_share: Some(2.0),
            ..Default::default()
        };
        let out = fundamental_signals(&f, 24.0, date(1), &thresholds());
        assert_eq!(out, vec![SignalKind::HistoricallyCheap]);
        let out = fundamental_signals(&f, 40.0, date(1), &thresholds());
        assert!(out.is_empty());
    }

    #[test]
    fn growth_margin_cash_and_events() {
        let f = Fundamentals {
            earnings_per_share: None,
            revenue_growth: Some(0.31),
            gross_margin: Some(0.62),
            free_cash_flow_yield: Some(0.07),
            next_earnings_date: Some(date(8)),
        };
        let out = fundamental_signals(&f, 50.0, date(3), &thresholds());
        assert_eq!(
            out,
            vec![
                SignalKind::StrongRevenueGrowth,
                SignalKind::HighGrossMargin,
                SignalKind::FreeCashFlowRich,
                SignalKind::EarningsImminent,
            ]
        );

        let later = Fundamentals {
            revenue_growth: Some(-0.05),
            next_earnings_date: Some(date(20)),
            ..Default::default()
        };
        let out = fundamental_signals(&later, 50.0, date(3), &thresholds());
        assert_eq!(out, vec![SignalKind::RevenueContraction]);
    }

    #[test]
    fn missing_fundamentals_produce_nothing() {
        let out = fundamental_signals(&Fundamentals::default(), 50.0, date(3), &thresholds());
        assert!(out.is_empty());
    }
}
