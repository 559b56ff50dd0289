//! hexbot CLI - Command-line interface
//!
//! Commands:
//! - play: Connect to a game server and play one game
//! - analyze: Score a position and show the engine's move

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexbot_cli::{analyze, play};

#[derive(Parser)]
#[command(name = "hexbot")]
#[command(about = "Hex playing agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game against a server
    Play(play::PlayArgs),
    /// Analyze a single position
    Analyze(analyze::AnalyzeArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Analyze(args) => analyze::run(args),
    }
}
