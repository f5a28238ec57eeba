//! TrendScan CLI: analyze bar files, batch scans and weight table inspection.
//!
//! Commands:
//! - `analyze`: score one CSV bar file and print the JSON report
//! - `scan`: score many files in parallel, one summary line per symbol
//! - `weights`: print the resolved weight table with its fingerprint
//! - `demo`: analyze a seeded synthetic random walk

mod load;
mod logging;
mod synthetic;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use trendscan_core::domain::{BenchmarkTrend, MarketInputs};
use trendscan_core::{AnalysisInput, AnalysisOutcome, AnalysisReport, Analyzer, EngineConfig};

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "trendscan",
    about = "TrendScan CLI: technical signal scoring for daily bars"
)]
struct Cli {
    /// Log output format (logs go to stderr).
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BenchmarkArg {
    /// Benchmark index trades above its long average.
    Above,
    /// Benchmark index trades below its long average.
    Below,
}

/// Broad-market context flags shared by `analyze` and `scan`.
#[derive(clap::Args)]
struct MarketArgs {
    /// Benchmark position relative to its long average.
    #[arg(long, value_enum, conflicts_with = "benchmark_bars")]
    benchmark: Option<BenchmarkArg>,

    /// Benchmark bar file; its position is derived from the long average.
    #[arg(long)]
    benchmark_bars: Option<PathBuf>,

    /// Volatility gauge reading (VIX-style).
    #[arg(long)]
    vix: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one CSV bar file and print the report as JSON.
    Analyze {
        /// CSV with header date,open,high,low,close,volume.
        #[arg(long)]
        bars: PathBuf,

        /// Symbol for the report. Defaults to the file name.
        #[arg(long)]
        symbol: Option<String>,

        /// Path to a TOML engine config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON fundamentals snapshot.
        #[arg(long)]
        fundamentals: Option<PathBuf>,

        #[command(flatten)]
        market: MarketArgs,

        /// Evaluate as of this bar index instead of the latest bar.
        #[arg(long)]
        as_of: Option<usize>,
    },
    /// Analyze many bar files in parallel and print a ranked summary.
    Scan {
        /// CSV bar files; symbols come from the file names.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Path to a TOML engine config.
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        market: MarketArgs,
    },
    /// Print the resolved weight table as TOML.
    Weights {
        /// Path to a TOML engine config.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Analyze a seeded synthetic random walk.
    Demo {
        /// RNG seed.
        #[arg(long, default_value_t = 7)]
        seed: u64,

        /// Number of bars to generate.
        #[arg(long, default_value_t = 400)]
        bars: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    match cli.command {
        Commands::Analyze {
            bars,
            symbol,
            config,
            fundamentals,
            market,
            as_of,
        } => run_analyze(&bars, symbol, config.as_deref(), fundamentals.as_deref(), &market, as_of),
        Commands::Scan {
            files,
            config,
            market,
        } => run_scan(&files, config.as_deref(), &market),
        Commands::Weights { config } => run_weights(config.as_deref()),
        Commands::Demo { seed, bars } => run_demo(seed, bars),
    }
}

fn build_analyzer(config_path: Option<&Path>) -> Result<Analyzer> {
    let config = match config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(Analyzer::new(config)?)
}

fn market_inputs(args: &MarketArgs, analyzer: &Analyzer) -> Result<MarketInputs> {
    let benchmark_trend = match (&args.benchmark, &args.benchmark_bars) {
        (Some(BenchmarkArg::Above), _) => Some(BenchmarkTrend::AboveLongAverage),
        (Some(BenchmarkArg::Below), _) => Some(BenchmarkTrend::BelowLongAverage),
        (None, Some(path)) => {
            let bars = load::load_bars(path)?;
            let period = analyzer.config().indicators.sma_long;
            let trend = BenchmarkTrend::from_bars(&bars, period);
            if trend.is_none() {
                warn!(path = %path.display(), period, "benchmark too short for its long average");
            }
            trend
        }
        (None, None) => None,
    };
    if let Some(vix) = args.vix {
        if !vix.is_finite() || vix < 0.0 {
            bail!("--vix must be a non-negative number, got {vix}");
        }
    }
    Ok(MarketInputs {
        benchmark_trend,
        volatility_gauge: args.vix,
    })
}

fn run_analyze(
    bars_path: &Path,
    symbol: Option<String>,
    config_path: Option<&Path>,
    fundamentals_path: Option<&Path>,
    market: &MarketArgs,
    as_of: Option<usize>,
) -> Result<()> {
    let analyzer = build_analyzer(config_path)?;
    let bars = load::load_bars(bars_path)?;
    let symbol = symbol.unwrap_or_else(|| load::symbol_from_path(bars_path));

    let mut input =
        AnalysisInput::new(symbol, bars).with_market(market_inputs(market, &analyzer)?);
    if let Some(path) = fundamentals_path {
        input = input.with_fundamentals(load::load_fundamentals(path)?);
    }

    let outcome = match as_of {
        Some(index) => analyzer.analyze_at(&input, index),
        None => analyzer.analyze(&input),
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn run_scan(files: &[PathBuf], config_path: Option<&Path>, market: &MarketArgs) -> Result<()> {
    let analyzer = build_analyzer(config_path)?;
    let market = market_inputs(market, &analyzer)?;

    let results: Vec<(String, Result<AnalysisOutcome>)> = files
        .par_iter()
        .map(|path| {
            let symbol = load::symbol_from_path(path);
            let outcome = load::load_bars(path)
                .map(|bars| {
                    let input = AnalysisInput::new(symbol.clone(), bars).with_market(market.clone());
                    analyzer.analyze(&input)
                })
                .map_err(anyhow::Error::from);
            (symbol, outcome)
        })
        .collect();

    let mut complete: Vec<AnalysisReport> = Vec::new();
    let mut short: Vec<(String, usize, usize)> = Vec::new();
    let mut failed = 0usize;
    for (symbol, outcome) in results {
        match outcome {
            Ok(AnalysisOutcome::Complete(report)) => complete.push(*report),
            Ok(AnalysisOutcome::InsufficientHistory {
                required,
                available,
            }) => short.push((symbol, required, available)),
            Err(e) => {
                warn!(%symbol, error = %e, "skipping file");
                failed += 1;
            }
        }
    }

    complete.sort_by(|a, b| {
        b.score
            .total_score
            .total_cmp(&a.score.total_score)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    for report in &complete {
        println!("{}", summary_line(report));
    }
    for (symbol, required, available) in &short {
        println!("{symbol:<8} insufficient history ({available}/{required} bars)");
    }
    info!(
        scanned = files.len(),
        complete = complete.len(),
        insufficient = short.len(),
        failed,
        "scan finished"
    );
    Ok(())
}

fn summary_line(report: &AnalysisReport) -> String {
    let risk = match &report.risk {
        Some(advice) => {
            let size = advice
                .position_size_pct
                .map_or_else(|| "-".to_string(), |s| format!("{s:.1}%"));
            format!("{:?} {:.2} size {size}", advice.stance, advice.stop_price)
        }
        None => "no stop".to_string(),
    };
    let regime = format!("{:?}", report.regime.label);
    let labels: Vec<&str> = report.score.active.iter().map(|s| s.label).collect();
    format!(
        "{:<8} {:>7.2} {regime:<6} {:>10.2}  {risk}  [{}]",
        report.symbol,
        report.score.total_score,
        report.price,
        labels.join(", ")
    )
}

#[derive(Serialize)]
struct WeightsDump<'a> {
    version: &'a str,
    fingerprint: String,
    scores: BTreeMap<&'static str, f64>,
}

fn run_weights(config_path: Option<&Path>) -> Result<()> {
    let analyzer = build_analyzer(config_path)?;
    let weights = &analyzer.config().weights;
    let dump = WeightsDump {
        version: &weights.version,
        fingerprint: weights.fingerprint(),
        scores: weights
            .resolved()
            .into_iter()
            .map(|(kind, score)| (kind.label(), score))
            .collect(),
    };
    print!("{}", toml::to_string_pretty(&dump)?);
    Ok(())
}

/// Off-hours alert rehearsal: the full pipeline on synthetic bars.
fn demo_outcome(seed: u64, count: usize) -> Result<AnalysisOutcome> {
    let analyzer = build_analyzer(None)?;
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).context("invalid demo start date")?;
    let bars = synthetic::random_walk(seed, count, start);
    info!(seed, bars = bars.len(), "generated synthetic walk");

    Ok(analyzer.analyze(&AnalysisInput::new(format!("DEMO{seed}"), bars)))
}

fn run_demo(seed: u64, count: usize) -> Result<()> {
    let outcome = demo_outcome(seed, count)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
