//! ormbench - compare the latency of data-access strategies.
//!
//! ```text
//! ormbench seed --database bench.db
//! ormbench run --database bench.db --warm-up yes
//! ormbench run --connection postgres_local --format json
//! ```

mod formatter;
mod prompt;
mod report;
mod settings;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use ormbench::{Benchmarker, HarnessConfig, DEFAULT_ITEM_ID, DEFAULT_ITERATIONS};
use ormbench_executors::{Backend, DEFAULT_POST_COUNT};

use crate::formatter::{create_formatter, OutputFormat};
use crate::settings::{Settings, DATABASE_URL_ENV};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "ormbench")]
#[command(version, about = "Latency comparison of data-access strategies")]
pub struct Args {
    /// Settings file with named connection strings
    #[arg(short = 's', long, global = true, default_value = "appsettings.json")]
    pub settings: PathBuf,

    /// Name of the connection string to use from the settings file
    #[arg(short = 'c', long, global = true, default_value = "sqlite_local")]
    pub connection: String,

    /// Connection target (SQLite path or postgres:// URL); overrides --connection
    #[arg(short = 'd', long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Time every strategy available for the target and print the report
    Run(RunArgs),
    /// Create the post table and fill it with generated rows
    Seed(SeedArgs),
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    /// Number of fetch_one calls in the single-item scenario
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Id fetched by the single-item scenario
    #[arg(long)]
    pub item_id: Option<i64>,

    /// Run a warm-up pass first; asks interactively when omitted
    #[arg(long, value_enum)]
    pub warm_up: Option<Answer>,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Keep failed (zero-time) strategies in the measured sections
    #[arg(long)]
    pub show_zero: bool,
}

#[derive(ClapArgs, Debug)]
pub struct SeedArgs {
    /// Number of rows to insert
    #[arg(short = 'r', long)]
    pub rows: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Answer {
    Yes,
    No,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ormbench=info,ormbench_executors=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = Settings::load(&args.settings)?;
    let target = settings::resolve_target(
        args.database.as_deref(),
        &settings,
        &args.connection,
        std::env::var(DATABASE_URL_ENV).ok(),
    )?;

    match args.command {
        Command::Run(run_args) => run_benchmark(&target, &settings, &run_args),
        Command::Seed(seed_args) => seed(&target, &settings, &seed_args),
    }
}

fn run_benchmark(target: &str, settings: &Settings, args: &RunArgs) -> anyhow::Result<()> {
    let iterations = args
        .iterations
        .or(settings.iterations)
        .unwrap_or(DEFAULT_ITERATIONS);
    let item_id = args.item_id.or(settings.item_id).unwrap_or(DEFAULT_ITEM_ID);

    let config = HarnessConfig::new(target)
        .with_iterations(iterations)
        .with_item_id(item_id);
    let mut bench = Benchmarker::new(config)?;
    for executor in ormbench_executors::executors_for(target)? {
        bench.register(executor);
    }

    let include_warm_up =
        choose_warm_up(args.warm_up, prompt::is_interactive(), prompt::ask_warm_up)?;

    info!(
        backend = %Backend::from_target(target),
        strategies = ?bench.executor_names(),
        "Running benchmark"
    );
    bench.run(include_warm_up).context("benchmark run aborted")?;

    let sections = report::build_sections(bench.results(), iterations, args.show_zero);
    let formatter = create_formatter(args.format);
    println!("{}", formatter.format_report(&sections));

    Ok(())
}

/// The `--warm-up` flag wins. Without it the question is only asked on a
/// terminal, so redirected output carries nothing but the report.
fn choose_warm_up(
    flag: Option<Answer>,
    interactive: bool,
    ask: impl FnOnce() -> anyhow::Result<bool>,
) -> anyhow::Result<bool> {
    match flag {
        Some(answer) => Ok(answer == Answer::Yes),
        None if interactive => ask(),
        None => {
            info!("Not attached to a terminal, skipping warm-up (pass --warm-up yes to run it)");
            Ok(false)
        }
    }
}

fn seed(target: &str, settings: &Settings, args: &SeedArgs) -> anyhow::Result<()> {
    let rows = args.rows.or(settings.rows).unwrap_or(DEFAULT_POST_COUNT);

    info!(backend = %Backend::from_target(target), rows, "Seeding database");
    ormbench_executors::seed(target, rows).context("seeding failed")?;
    println!("Seeded {} rows", rows);

    Ok(())
}
