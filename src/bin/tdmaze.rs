//! tdmaze CLI - Tabular TD learning on grid mazes
//!
//! This CLI provides a unified interface for:
//! - Training Q-learning and SARSA agents with pluggable exploration
//! - Rendering maze files

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tdmaze")]
#[command(version, about = "Tabular TD learning on grid mazes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning or SARSA agent
    Train(Box<tdmaze::cli::commands::train::TrainArgs>),

    /// Print a maze with its goal cells
    Render(tdmaze::cli::commands::render::RenderArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tdmaze::cli::commands::train::execute(*args),
        Commands::Render(args) => tdmaze::cli::commands::render::execute(args),
    }
}
