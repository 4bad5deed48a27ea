//! CLI application for trading signal extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, detect, extract, generate, patterns};

/// sigparse - Extract structured fields from trading signal messages
#[derive(Parser)]
#[command(name = "sigparse")]
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
    /// Extract fields from a single message
    Extract(extract::ExtractArgs),

    /// Extract fields from many message files
    Batch(batch::BatchArgs),

    /// Detect the message format and print a starting template
    Detect(detect::DetectArgs),

    /// Generate a pattern from a selected part of a message
    Generate(generate::GenerateArgs),

    /// List the built-in pattern library
    Patterns(patterns::PatternsArgs),

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
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Detect(args) => detect::run(args).await,
        Commands::Generate(args) => generate::run(args).await,
        Commands::Patterns(args) => patterns::run(args).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
