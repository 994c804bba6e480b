// Draft day entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (stderr, so stdout carries only results)
// 3. Load config (copying defaults on first run)
// 4. Run the requested subcommand and print or save its output

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use draftday_core::config::{self, Config};
use draftday_core::export;
use draftday_core::lottery::session::LotterySession;
use draftday_core::schedule::builder::build_schedule;

#[derive(Parser)]
#[command(name = "draftday")]
#[command(about = "Weighted draft lottery and season schedule builder", long_about = None)]
struct Cli {
    /// Directory holding config/ and defaults/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the lottery once and print the draft order
    Draw {
        /// Print the full draw record as JSON
        #[arg(long)]
        json: bool,
        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Also save the draw record to this JSON file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Simulate many lotteries and report pick frequencies per seed
    Sample {
        /// Number of simulated lotteries (defaults to lottery.iterations)
        #[arg(long)]
        iterations: Option<usize>,
        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Write the CSV report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Build the 14-week season schedule
    Schedule {
        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Write the CSV grid here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;

    let config = config::load_config(&cli.base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams",
        config.league.name, config.league.num_teams
    );

    match cli.command {
        Commands::Draw { json, seed, out } => draw(&config, json, seed, out),
        Commands::Sample {
            iterations,
            seed,
            out,
        } => sample(&config, iterations, seed, out),
        Commands::Schedule { seed, out } => schedule(&config, seed, out),
    }
}

fn session(config: &Config, seed: Option<u64>) -> anyhow::Result<LotterySession> {
    let mut settings = config.lottery.clone();
    settings.seed = seed.or(settings.seed);

    let names = config.league.standings().lottery_names();
    LotterySession::new(names, &settings).context("failed to set up lottery")
}

fn draw(config: &Config, json: bool, seed: Option<u64>, out: Option<PathBuf>) -> anyhow::Result<()> {
    let mut session = session(config, seed)?;
    let record = session.record_draw();

    if json {
        export::write_draw_json(&record, io::stdout().lock())
            .context("failed to write draw record")?;
    } else {
        for (pick, name) in record.order.iter().enumerate() {
            println!("{:>2}. {}", pick + 1, name);
        }
    }

    if let Some(path) = out {
        export::save_draw_json(&record, &path).context("failed to save draw record")?;
    }
    Ok(())
}

fn sample(
    config: &Config,
    iterations: Option<usize>,
    seed: Option<u64>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut session = session(config, seed)?;
    let iterations = iterations.unwrap_or(config.lottery.iterations);
    let report = session
        .run_sampling(iterations)
        .context("failed to run lottery sampling")?;

    match out {
        Some(path) => {
            export::save_sampling_csv(&report, &path).context("failed to save sampling report")?
        }
        None => export::write_sampling_csv(&report, io::stdout().lock())
            .context("failed to write sampling report")?,
    }
    Ok(())
}

fn schedule(config: &Config, seed: Option<u64>, out: Option<PathBuf>) -> anyhow::Result<()> {
    let mut options = config.schedule.options();
    options.seed = seed.or(options.seed);

    let schedule = build_schedule(&config.schedule.divisions, &config.schedule.rivals, &options)
        .context("failed to build schedule")?;

    match out {
        Some(path) => {
            export::save_schedule_csv(&schedule, &path).context("failed to save schedule")?
        }
        None => export::write_schedule_csv(&schedule, io::stdout().lock())
            .context("failed to write schedule")?,
    }
    Ok(())
}

/// Initialize tracing to stderr; stdout is reserved for results.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftday_core=info,draftday=info,warn")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
