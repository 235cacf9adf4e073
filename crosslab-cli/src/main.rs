//! CrossLab CLI — fetch data, run crossover backtests, list tickers.
//!
//! Commands:
//! - `run` — backtest one symbol from a TOML config and/or flags
//! - `fetch` — download daily bars from Yahoo Finance into a CSV file
//! - `watchlist` — print the default tickers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use crosslab_core::config::{DataConfig, RunConfig, DEFAULT_SYNTHETIC_BARS};
use crosslab_core::data::{
    write_csv, CsvProvider, DataProvider, SyntheticKind, SyntheticProvider, YahooProvider,
    WATCHLIST,
};
use crosslab_core::engine::{BacktestEngine, BacktestResult};
use crosslab_core::export::{export_json, save_artifacts, signal_messages};

const NO_DATA: &str = "No data found for the selected ticker and date range.";

#[derive(Parser)]
#[command(
    name = "crosslab",
    version,
    about = "CrossLab CLI — dual moving-average crossover backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one symbol. Flags override values from --config.
    Run {
        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ticker symbol (e.g. BBVA.MC). Defaults to the first watchlist entry.
        #[arg(long)]
        symbol: Option<String>,

        /// First date included (YYYY-MM-DD). Defaults to one year ago.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// First date excluded (YYYY-MM-DD). Defaults to tomorrow.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Short moving average period.
        #[arg(long)]
        short: Option<usize>,

        /// Long moving average period.
        #[arg(long)]
        long: Option<usize>,

        /// Read bars from a CSV file instead of Yahoo Finance.
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<PathBuf>,

        /// Use generated bars: flat, linear or random_walk.
        #[arg(long)]
        synthetic: Option<SyntheticKind>,

        /// Seed for synthetic random_walk data (flag or config).
        #[arg(long, conflicts_with = "csv")]
        seed: Option<u64>,

        /// Write result.json, trace.csv, signals.csv and trades.csv here.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full result as JSON instead of the text report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Download daily bars from Yahoo Finance into a CSV file.
    Fetch {
        #[arg(long)]
        symbol: String,

        /// First date included (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// First date excluded (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,

        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the default tickers.
    Watchlist,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            symbol,
            start,
            end,
            short,
            long,
            csv,
            synthetic,
            seed,
            output_dir,
            json,
        } => {
            let mut run_config = match config {
                Some(path) => RunConfig::load(&path)?,
                None => {
                    let today = Local::now().date_naive();
                    RunConfig::new(WATCHLIST[0], today - Duration::days(365), today + Duration::days(1))
                }
            };
            if let Some(symbol) = symbol {
                run_config.symbol = symbol;
            }
            if let Some(start) = start {
                run_config.start_date = start;
            }
            if let Some(end) = end {
                run_config.end_date = end;
            }
            if let Some(short) = short {
                run_config.strategy.short_period = short;
            }
            if let Some(long) = long {
                run_config.strategy.long_period = long;
            }
            apply_data_overrides(&mut run_config, csv, synthetic, seed)?;
            run_config.validate().context("invalid run configuration")?;
            run_cmd(&run_config, output_dir, json)
        }
        Commands::Fetch {
            symbol,
            start,
            end,
            out,
        } => fetch_cmd(&symbol, start, end, out),
        Commands::Watchlist => {
            for ticker in WATCHLIST {
                println!("{ticker}");
            }
            Ok(())
        }
    }
}

/// Apply `--csv`, `--synthetic` and `--seed` on top of the configured source.
///
/// `--synthetic` keeps the bar count and seed of a synthetic source already in
/// the config; `--seed` requires a synthetic source.
fn apply_data_overrides(
    config: &mut RunConfig,
    csv: Option<PathBuf>,
    synthetic: Option<SyntheticKind>,
    seed: Option<u64>,
) -> Result<()> {
    if let Some(path) = csv {
        config.data = DataConfig::Csv { path };
        return Ok(());
    }

    let (current_bars, current_seed) = match &config.data {
        DataConfig::Synthetic { bars, seed, .. } => (*bars, *seed),
        _ => (DEFAULT_SYNTHETIC_BARS, 0),
    };
    if let Some(kind) = synthetic {
        config.data = DataConfig::Synthetic {
            kind,
            bars: current_bars,
            seed: seed.unwrap_or(current_seed),
        };
    } else if let Some(seed) = seed {
        match &mut config.data {
            DataConfig::Synthetic { seed: configured, .. } => *configured = seed,
            _ => bail!("--seed applies only to synthetic data (use --synthetic or a SYNTHETIC config)"),
        }
    }
    Ok(())
}

fn provider_for(data: &DataConfig) -> Result<Box<dyn DataProvider>> {
    Ok(match data {
        DataConfig::Yahoo => Box::new(YahooProvider::new()?),
        DataConfig::Csv { path } => Box::new(CsvProvider::new(path)),
        DataConfig::Synthetic { kind, bars, seed } => {
            Box::new(SyntheticProvider::new(*kind, *bars, *seed))
        }
    })
}

fn run_cmd(config: &RunConfig, output_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let provider = provider_for(&config.data)?;
    let series = provider
        .fetch(&config.symbol, config.start_date, config.end_date)
        .with_context(|| format!("failed to load {} from {}", config.symbol, provider.name()))?;

    info!("{}: loaded {} bars from {}", config.symbol, series.len(), provider.name());
    if series.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let engine = BacktestEngine::new(config.strategy)?;
    let result = engine.run(&series)?;

    if json {
        println!("{}", export_json(&result)?);
    } else {
        print_report(&result);
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&result, &config.run_id(), &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn print_report(result: &BacktestResult) {
    let s = &result.summary;
    println!(
        "{}: SMA {}/{} over {} bars",
        result.symbol, result.config.short_period, result.config.long_period, s.bars
    );
    println!();

    if result.signal_log.is_empty() {
        println!("No signals.");
    } else {
        println!("Signals:");
        for line in signal_messages(&result.signal_log) {
            println!("  {line}");
        }
    }
    println!();

    println!("  Buys / Sells:    {} / {}", s.buys, s.sells);
    println!(
        "  Closed trades:   {} ({} winners, {:.1}%)",
        s.closed_trades,
        s.winners,
        s.win_rate * 100.0
    );
    println!("  Realized P&L:    {:.2}", s.realized_pnl);
    println!("  Unrealized P&L:  {:.2}", s.unrealized_pnl);
    println!("  Total P&L:       {:.2}", s.total_pnl());
    println!("  Final position:  {:?}", result.final_position.status());
    if let Some(close) = s.final_close {
        println!("  Last close:      {close:.2}");
    }
}

fn fetch_cmd(symbol: &str, start: NaiveDate, end: NaiveDate, out: PathBuf) -> Result<()> {
    if start >= end {
        bail!("start date {start} must be before end date {end}");
    }
    let provider = YahooProvider::new()?;
    let series = provider
        .fetch(symbol, start, end)
        .with_context(|| format!("failed to fetch {symbol}"))?;
    info!("{symbol}: fetched {} bars from {}", series.len(), provider.name());
    if series.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }

    let file = std::fs::File::create(&out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    write_csv(&series, file)?;
    println!("Wrote {} bars for {symbol} to {}", series.len(), out.display());
    Ok(())
}
