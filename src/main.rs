use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use engine::CostEngine;
use ledger::{LotRegistry, Snapshot};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

mod output;

/// The main entry point for the eggcost application.
fn main() -> anyhow::Result<()> {
    // Load RUST_LOG and EGGCOST__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let snapshot = Arc::new(
        Snapshot::from_json_file(&cli.data)
            .with_context(|| format!("reading ledger snapshot {}", cli.data.display()))?,
    );

    let mut engine = CostEngine::new(config, snapshot.clone(), snapshot.clone(), snapshot.clone())?
        .with_revenue_source(snapshot.clone());
    if let Some(as_of) = cli.as_of {
        engine = engine.with_as_of(as_of);
    }

    match cli.command {
        Commands::Lots => {
            let lots = snapshot.list_active_lots()?;
            if cli.json {
                output::print_json(&lots)?;
            } else {
                output::print_lots(&lots);
            }
        }
        Commands::Daily(args) => {
            let series = if args.days > 1 {
                engine.compute_daily_series(args.lot, args.date, args.days)?
            } else {
                vec![engine.compute_daily_cost(args.lot, args.date)?]
            };
            if cli.json {
                output::print_json(&series)?;
            } else {
                output::print_daily(&series);
            }
        }
        Commands::Phases(args) => {
            let analysis = engine.compute_phase_analysis(args.lot)?;
            if cli.json {
                output::print_json(&analysis)?;
            } else {
                output::print_phases(&analysis);
            }
        }
        Commands::Stats(args) => {
            let window = engine.compute_statistics(args.lot, args.window)?;
            if cli.json {
                output::print_json(&window)?;
            } else {
                output::print_statistics(&window.statistics);
                output::print_alerts(&window.alerts);
            }
        }
        Commands::Report(args) => {
            let report = if args.rank {
                engine.compile_report_with_ranking(args.lot)?
            } else {
                engine.compile_report(args.lot)?
            };
            if cli.json {
                output::print_json(&report)?;
            } else {
                output::print_report(&report);
            }
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Egg production cost accounting for laying-hen lots.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply if it does not exist.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Path to the JSON export of the lot registry and ledgers.
    #[arg(long, global = true, default_value = "snapshot.json")]
    data: PathBuf,

    /// The date treated as "today" (format: YYYY-MM-DD). Defaults to the local date.
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active lots.
    Lots,
    /// Show the cost per egg of a day, or of the last N days.
    Daily(DailyArgs),
    /// Show the Initial/Productive phase economics of a lot.
    Phases(LotArgs),
    /// Show rolling-window statistics and alerts.
    Stats(StatsArgs),
    /// Compile the full report of a lot.
    Report(ReportArgs),
}

#[derive(Parser)]
struct LotArgs {
    /// The lot identifier.
    #[arg(long)]
    lot: Uuid,
}

#[derive(Parser)]
struct DailyArgs {
    /// The lot identifier.
    #[arg(long)]
    lot: Uuid,

    /// The day to compute (format: YYYY-MM-DD). Defaults to the as-of date.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Number of days to show, ending on `--date`.
    #[arg(long, default_value_t = 1)]
    days: u32,
}

#[derive(Parser)]
struct StatsArgs {
    /// The lot identifier.
    #[arg(long)]
    lot: Uuid,

    /// Window length in days. Defaults to `statistics.window_days` from the configuration.
    #[arg(long)]
    window: Option<u32>,
}

#[derive(Parser)]
struct ReportArgs {
    /// The lot identifier.
    #[arg(long)]
    lot: Uuid,

    /// Also rank the lot against every active lot.
    #[arg(long)]
    rank: bool,
}
