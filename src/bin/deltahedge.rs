//! Command-line entry point for the daily delta-hedge and hedge-PnL workflows.
//!
//! ```text
//! deltahedge hedge --positions data/positions.csv --market data/market_data.csv \
//!     --output data/daily_hedges.csv
//! deltahedge pnl --hedges data/daily_hedges.csv --output data/hedge_pnl.csv
//! deltahedge run --positions data/positions.csv --market data/market_data.csv \
//!     --hedges-out data/daily_hedges.csv --pnl-out data/hedge_pnl.csv
//! ```
//!
//! Files ending in `.json` are read and written as JSON, everything else as CSV.
//! Logging goes to stderr; set `RUST_LOG` to override the default `deltahedge=info`.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use deltahedge::config::{FailurePolicy, HedgeConfig};
use deltahedge::hedging::{DailyHedgeRecord, compute_hedges};
use deltahedge::risk::{PnLRecord, compute_hedge_pnl, summarize};
use deltahedge::tables;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "deltahedge")]
#[command(about = "Daily delta hedges and hedge PnL for a European option book")]
struct Cli {
    #[command(flatten)]
    overrides: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file (contract_multiplier, day_count, failure_policy)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Share units per option contract
    #[arg(long, global = true)]
    multiplier: Option<f64>,

    /// Drop legs the pricer rejects instead of aborting the run
    #[arg(long, global = true)]
    skip_failed_legs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute daily net deltas and hedge shares
    Hedge {
        #[arg(long)]
        positions: PathBuf,
        #[arg(long)]
        market: PathBuf,
        #[arg(long, default_value = "data/daily_hedges.csv")]
        output: PathBuf,
    },
    /// Compute hedge PnL from a daily hedge table
    Pnl {
        #[arg(long, default_value = "data/daily_hedges.csv")]
        hedges: PathBuf,
        #[arg(long, default_value = "data/hedge_pnl.csv")]
        output: PathBuf,
    },
    /// Run both stages; the PnL stage reads the hedge table just written
    Run {
        #[arg(long)]
        positions: PathBuf,
        #[arg(long)]
        market: PathBuf,
        #[arg(long, default_value = "data/daily_hedges.csv")]
        hedges_out: PathBuf,
        #[arg(long, default_value = "data/hedge_pnl.csv")]
        pnl_out: PathBuf,
    },
}

impl ConfigArgs {
    fn resolve(&self) -> AppResult<HedgeConfig> {
        let mut config = match &self.config {
            Some(path) => HedgeConfig::from_json_file(path)?,
            None => HedgeConfig::default(),
        };
        if let Some(multiplier) = self.multiplier {
            config.contract_multiplier = multiplier;
        }
        if self.skip_failed_legs {
            config.failure_policy = FailurePolicy::SkipLeg;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run_hedge(
    positions: &Path,
    market: &Path,
    output: &Path,
    config: &HedgeConfig,
) -> AppResult<Vec<DailyHedgeRecord>> {
    let book = tables::load_positions(positions)?;
    let snapshots = tables::load_market(market)?;
    info!(
        positions = book.len(),
        snapshots = snapshots.len(),
        "loaded inputs"
    );

    let hedges = compute_hedges(&book, &snapshots, config)?;
    tables::save_hedges(output, &hedges)?;
    info!(
        output = %output.display(),
        records = hedges.len(),
        "delta hedging calculation complete"
    );
    Ok(hedges)
}

fn run_pnl(hedges: &Path, output: &Path) -> AppResult<Vec<PnLRecord>> {
    let records = tables::load_hedges(hedges)?;
    let pnl = compute_hedge_pnl(&records)?;
    tables::save_pnl(output, &pnl)?;
    info!(
        output = %output.display(),
        records = pnl.len(),
        "hedge pnl calculation complete"
    );

    for summary in summarize(&pnl) {
        info!(
            underlying = %summary.underlying,
            days = summary.days,
            from = %summary.first_date,
            to = %summary.last_date,
            cumulative_pnl = summary.final_cumulative_pnl,
            worst_day = summary.worst_daily_pnl,
            "pnl summary"
        );
    }
    Ok(pnl)
}

fn main() -> AppResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deltahedge=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.overrides.resolve()?;
    info!(
        multiplier = config.contract_multiplier,
        day_count = ?config.day_count,
        failure_policy = ?config.failure_policy,
        "configuration loaded"
    );

    match cli.command {
        Command::Hedge {
            positions,
            market,
            output,
        } => {
            run_hedge(&positions, &market, &output, &config)?;
        }
        Command::Pnl { hedges, output } => {
            run_pnl(&hedges, &output)?;
        }
        Command::Run {
            positions,
            market,
            hedges_out,
            pnl_out,
        } => {
            run_hedge(&positions, &market, &hedges_out, &config)?;
            run_pnl(&hedges_out, &pnl_out)?;
        }
    }
    Ok(())
}
