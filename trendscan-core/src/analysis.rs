//! Analysis entry point: bars in, report out.
//!
//! Pipeline: live-quote overlay → indicator frame → rule signals + pattern
//! detectors → regime assessment → scoring → stop and size.
//! The analyzer holds no mutable state and may be shared across threads.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::components::detector::PatternDetector;
use crate::components::indicator::value_at;
use crate::config::EngineConfig;
use crate::domain::{apply_live_quote, Bar, Fundamentals, LiveQuote, MarketInputs};
use crate::error::ConfigError;
use crate::indicators::IndicatorFrame;
use crate::patterns::{detect_all, standard_detectors};
use crate::regime::RegimeAssessment;
use crate::risk::RiskAdvice;
use crate::scoring::{ScoreReport, ScoringEngine};
use crate::signals::{extract_signals, RuleInputs, SignalKind};

/// Everything one analysis reads. Built by the caller from validated data.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub symbol: String,
    /// Ascending by date, duplicates already resolved.
    pub bars: Vec<Bar>,
    pub live_quote: Option<LiveQuote>,
    pub fundamentals: Option<Fundamentals>,
    pub market: MarketInputs,
}

impl AnalysisInput {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            ..Default::default()
        }
    }

    pub fn with_live_quote(mut self, quote: LiveQuote) -> Self {
        self.live_quote = Some(quote);
        self
    }

    pub fn with_fundamentals(mut self, fundamentals: Fundamentals) -> Self {
        self.fundamentals = Some(fundamentals);
        self
    }

    pub fn with_market(mut self, market: MarketInputs) -> Self {
        self.market = market;
        self
    }

    /// Bars with the live quote overlaid, if any.
    fn effective_bars(&self) -> Vec<Bar> {
        match &self.live_quote {
            Some(quote) => apply_live_quote(&self.bars, quote),
            None => self.bars.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub price: f64,
    pub atr_pct: Option<f64>,
    pub regime: RegimeAssessment,
    pub score: ScoreReport,
    pub risk: Option<RiskAdvice>,
    pub weights_version: String,
    pub weights_fingerprint: String,
}

impl AnalysisReport {
    pub fn fired(&self, kind: SignalKind) -> bool {
        self.score.is_active(kind) || self.score.suppression(kind).is_some()
    }
}

/// Result of an analysis call. Short history is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    InsufficientHistory { required: usize, available: usize },
    Complete(Box<AnalysisReport>),
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Complete(report) => Some(report),
            AnalysisOutcome::InsufficientHistory { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<AnalysisReport> {
        match self {
            AnalysisOutcome::Complete(report) => Some(*report),
            AnalysisOutcome::InsufficientHistory { .. } => None,
        }
    }
}

pub struct Analyzer {
    config: EngineConfig,
    scoring: ScoringEngine,
    detectors: Vec<Box<dyn PatternDetector>>,
    fingerprint: String,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("weights_version", &self.config.weights.version)
            .field("fingerprint", &self.fingerprint)
            .field(
                "detectors",
                &self.detectors.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let detectors = standard_detectors(&config.indicators, &config.patterns);
        let fingerprint = config.weights.fingerprint();
        Ok(Self {
            scoring: ScoringEngine::new(config.weights.clone()),
            detectors,
            fingerprint,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze as of the latest bar (after any live-quote overlay).
    pub fn analyze(&self, input: &AnalysisInput) -> AnalysisOutcome {
        let bars = input.effective_bars();
        let last = bars.len().saturating_sub(1);
        self.evaluate(input, &bars, last)
    }

    /// Analyze as of `index`, reading only `bars[..=index]`. An index past the
    /// end evaluates the latest bar.
    pub fn analyze_at(&self, input: &AnalysisInput, index: usize) -> AnalysisOutcome {
        let bars = input.effective_bars();
        let index = index.min(bars.len().saturating_sub(1));
        self.evaluate(input, &bars, index)
    }

    fn evaluate(&self, input: &AnalysisInput, bars: &[Bar], index: usize) -> AnalysisOutcome {
        let required = self.config.min_history();
        let available = if bars.is_empty() { 0 } else { index + 1 };
        if available < required {
            debug!(symbol = %input.symbol, required, available, "insufficient history");
            return AnalysisOutcome::InsufficientHistory {
                required,
                available,
            };
        }

        let window = &bars[..=index];
        let bar = &window[index];
        let frame = IndicatorFrame::compute(window, &self.config.indicators);

        let rule_inputs = RuleInputs {
            live_quote: input.live_quote.as_ref(),
            fundamentals: input.fundamentals.as_ref(),
        };
        let mut kinds = extract_signals(window, index, &frame, &self.config.thresholds, rule_inputs);
        kinds.extend(detect_all(&self.detectors, window, index, &frame));

        let regime = RegimeAssessment::assess(
            value_at(&frame.adx, index),
            &input.market,
            &self.config.regime,
        );
        let score = self.scoring.score(&kinds, &regime);

        let risk = match (value_at(&frame.atr, index), value_at(&frame.psar, index)) {
            (Some(atr), Some(sar)) => {
                RiskAdvice::assess(bar.close, atr, sar, score.total_score, &self.config.risk)
            }
            _ => None,
        };

        debug!(
            symbol = %input.symbol,
            as_of = %bar.date,
            bars = window.len(),
            regime = ?regime.label,
            context = ?regime.context,
            active = score.active.len(),
            suppressed = score.suppressed.len(),
            score = score.total_score,
            "analysis complete"
        );

        AnalysisOutcome::Complete(Box::new(AnalysisReport {
            symbol: input.symbol.clone(),
            as_of: bar.date,
            price: bar.close,
            atr_pct: value_at(&frame.atr_pct, index),
            regime,
            score,
            risk,
            weights_version: self.config.weights.version.clone(),
            weights_fingerprint: self.fingerprint.clone(),
        }))
    }
}
