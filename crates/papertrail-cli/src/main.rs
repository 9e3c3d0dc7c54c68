//! CLI application for receipt transcript parsing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, budget, config, parse, validate};

/// PaperTrail - Turn receipt OCR transcripts into categorized expenses
#[derive(Parser)]
#[command(name = "papertrail")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single receipt transcript
    Parse(parse::ParseArgs),

    /// Check that subtotal + tax reconciles with the total
    Validate(validate::ValidateArgs),

    /// Parse many transcripts and summarize spending
    Batch(batch::BatchArgs),

    /// Track daily, weekly and monthly spending
    Budget(budget::BudgetArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Parse(args) => parse::run(args, config_path).await,
        Commands::Validate(args) => validate::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Budget(args) => budget::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
