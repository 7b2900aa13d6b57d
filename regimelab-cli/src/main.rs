//! RegimeLab CLI — run backtests, sweeps, and walk-forward validation.
//!
//! Commands:
//! - `run` — execute one backtest from a TOML config, print a metrics
//!   summary, optionally export the ledger CSV or the full result JSON
//! - `sweep` — grid-search mean-reversion parameters over the config's data
//! - `walk-forward` — fit on Train, report frozen-params performance on
//!   Validation and Test

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use regimelab_runner::{
    bootstrap_sharpe, export_ledger_csv, load_bars_csv, run_single, run_walk_forward,
    BacktestResult, BootstrapConfig, ParamGrid, ParamSweep, RunConfig, WalkForwardConfig,
};

#[derive(Parser)]
#[command(
    name = "regimelab",
    about = "RegimeLab CLI — regime-aware backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Write the trade ledger to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write the full result JSON to this file.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Append a bootstrap Sharpe distribution to the summary.
        #[arg(long, default_value_t = false)]
        bootstrap: bool,
    },
    /// Grid-search mean-reversion parameters over the config's data.
    Sweep {
        /// Path to a TOML config file (its strategy supplies regime/risk).
        #[arg(long)]
        config: PathBuf,

        /// Run trials sequentially instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Walk-forward validation: fit on Train, freeze, evaluate OOS.
    WalkForward {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            export,
            output,
            bootstrap,
        } => cmd_run(&config, export.as_deref(), output.as_deref(), bootstrap),
        Commands::Sweep { config, sequential } => cmd_sweep(&config, sequential),
        Commands::WalkForward { config } => cmd_walk_forward(&config),
    }
}

fn load_run_inputs(config_path: &std::path::Path) -> Result<(RunConfig, Vec<regimelab_core::domain::Bar>)> {
    let config = RunConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let bars = load_bars_csv(&config.backtest.bars_csv, &config.backtest.symbol)
        .with_context(|| format!("loading bars {}", config.backtest.bars_csv.display()))?;
    Ok((config, bars))
}

fn cmd_run(
    config_path: &std::path::Path,
    export: Option<&std::path::Path>,
    output: Option<&std::path::Path>,
    bootstrap: bool,
) -> Result<()> {
    let (config, bars) = load_run_inputs(config_path)?;
    let result = run_single(&bars, &config.strategy, &config.to_settings())?;

    print_summary(&result);

    if bootstrap {
        let summary = bootstrap_sharpe(
            &result.ledger,
            &BootstrapConfig {
                periods_per_year: config.backtest.periods_per_year,
                ..Default::default()
            },
        );
        println!(
            "bootstrap sharpe ({} trials): p05 {:.2}  p50 {:.2}  p95 {:.2}  P(>0) {:.0}%",
            summary.trials,
            summary.p05,
            summary.p50,
            summary.p95,
            summary.prob_positive * 100.0
        );
    }

    if let Some(path) = export {
        export_ledger_csv(&result.ledger, path)
            .with_context(|| format!("exporting ledger to {}", path.display()))?;
        println!("ledger written to {}", path.display());
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing result to {}", path.display()))?;
        println!("result written to {}", path.display());
    }

    Ok(())
}

fn cmd_sweep(config_path: &std::path::Path, sequential: bool) -> Result<()> {
    let (config, bars) = load_run_inputs(config_path)?;
    let grid = ParamGrid::mean_reversion_default();
    let outcome = ParamSweep::new()
        .with_parallelism(!sequential)
        .sweep(&bars, &grid, &config.strategy, &config.to_settings());

    println!(
        "{} trials, {} rejected",
        outcome.trials.len(),
        outcome.rejected_count()
    );
    match outcome.best() {
        Some(best) => {
            println!("best score: {:.4}", best.score);
            println!("params: {}", serde_json::to_string(&best.params.signal)?);
            if let Some(result) = &best.result {
                print_summary(result);
            }
        }
        None => bail!("every trial was rejected; loosen the constraints or widen the grid"),
    }
    Ok(())
}

fn cmd_walk_forward(config_path: &std::path::Path) -> Result<()> {
    let (config, bars) = load_run_inputs(config_path)?;
    let report = run_walk_forward(
        &bars,
        &ParamGrid::mean_reversion_default(),
        &config.strategy,
        &config.to_settings(),
        &WalkForwardConfig::default(),
    )?;

    println!(
        "split: train {} bars, validation {} bars, test {} bars",
        report.split.train_len(),
        report.split.validation_len(),
        report.split.test_len()
    );
    println!("chosen params: {}", serde_json::to_string(&report.chosen.signal)?);
    for (name, segment) in [
        ("train", &report.train),
        ("validation", &report.validation),
        ("test", &report.test),
    ] {
        println!(
            "{name:>10}: score {:.4}  sharpe {:.2}  trades {}  max_dd {:.1}%",
            segment.score,
            segment.metrics.sharpe,
            segment.metrics.trade_count,
            segment.metrics.max_drawdown * 100.0
        );
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;
    println!("symbol: {}", result.symbol);
    println!(
        "bars: {} (warmup {})  signals: {}",
        result.bar_count, result.warmup_bars, result.signal_count
    );
    println!(
        "trades: {}  win rate: {:.0}%  profit factor: {:.2}  avg hold: {:.1} bars",
        m.trade_count,
        m.win_rate * 100.0,
        m.profit_factor,
        m.avg_bars_held
    );
    println!(
        "return: {:.2}%  sharpe: {:.2}  max drawdown: {:.1}%",
        m.total_return * 100.0,
        m.sharpe,
        m.max_drawdown * 100.0
    );
    println!(
        "final capital: {:.2}  score: {:.4}{}",
        result.ledger.capital(),
        result.score,
        if result.flags.is_clean() { "" } else { "  [constraints violated]" }
    );
}
