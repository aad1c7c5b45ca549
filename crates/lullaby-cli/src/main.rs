use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::input::{ChildArgs, InputArgs};
use commands::patterns::{Analysis, PatternArgs};
use commands::predict::View;

#[derive(Parser)]
#[command(name = "lullaby-cli", version, about = "Lullaby sleep prediction CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the next sleep
    Predict(InputArgs),
    /// Forecast with status and any sleep in progress
    Upcoming(InputArgs),
    /// Overdue / soon / upcoming summary
    Status(InputArgs),
    /// Recommended morning wake time
    WakeTime(PatternArgs),
    /// Recommended bedtime
    Bedtime(PatternArgs),
    /// Recommended time awake between sleeps
    WakeWindow(PatternArgs),
    /// Night sleep consistency and trend
    Quality(PatternArgs),
    /// Daytime nap plan
    Naps(InputArgs),
    /// Every analysis in one report
    Insights(InputArgs),
    /// Age-based sleep guidelines
    Guidelines(ChildArgs),
    /// Record a skipped sleep
    Skip(commands::skip::SkipArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LULLABY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Predict(input) => commands::predict::run(View::Prediction, input),
        Commands::Upcoming(input) => commands::predict::run(View::Upcoming, input),
        Commands::Status(input) => commands::predict::run(View::Status, input),
        Commands::WakeTime(args) => commands::patterns::run(Analysis::WakeTime, args),
        Commands::Bedtime(args) => commands::patterns::run(Analysis::Bedtime, args),
        Commands::WakeWindow(args) => commands::patterns::run(Analysis::WakeWindow, args),
        Commands::Quality(args) => commands::patterns::run(Analysis::Quality, args),
        Commands::Naps(input) => commands::patterns::run_naps(input),
        Commands::Insights(input) => commands::patterns::run_insights(input),
        Commands::Guidelines(child) => commands::guidelines::run(child),
        Commands::Skip(args) => commands::skip::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
