//! `swapval` — bootstrap the sterling curves, revalue the Euribor swaps and
//! replay the configured quote scenarios.
//!
//! ```bash
//! # embedded 4 October 2016 market
//! swapval
//!
//! # own market data, cubic curves, solver traces
//! RUST_LOG=swapval=debug,ql_bootstrap=debug swapval --config market.toml --interpolation log-cubic
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use swapval::termstructures::InterpolationPolicy;
use swapval::{ConsoleReport, MarketConfig, Workflow};
use tracing_subscriber::EnvFilter;

/// Curve bootstrap and swap revaluation under quote scenarios
#[derive(Debug, Parser)]
#[command(name = "swapval", version, about, long_about = None)]
struct Cli {
    /// Market data file (TOML); the embedded market is used when absent
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Discount-factor interpolation, overriding the market file
    #[arg(short, long, value_enum)]
    interpolation: Option<Interpolation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Interpolation {
    /// Log-linear discount factors
    LogLinear,
    /// Natural cubic spline on log discount factors
    LogCubic,
}

impl From<Interpolation> for InterpolationPolicy {
    fn from(i: Interpolation) -> Self {
        match i {
            Interpolation::LogLinear => InterpolationPolicy::LogLinear,
            Interpolation::LogCubic => InterpolationPolicy::LogCubicNatural,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => MarketConfig::load(path)?,
        None => MarketConfig::embedded()?,
    };
    if let Some(i) = cli.interpolation {
        config = config.with_interpolation(i.into());
    }

    let stdout = std::io::stdout();
    let mut report = ConsoleReport::new(stdout.lock());
    let summary = Workflow::new(&config)
        .run(&mut report)
        .context("revaluation failed")?;
    tracing::info!(
        scenarios = summary.scenarios,
        valuations = summary.valuations,
        "run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
            let _ = e.print();
            return code;
        }
    };
    init_tracing();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
