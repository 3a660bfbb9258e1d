//! Chexers CLI - Command-line interface
//!
//! Commands:
//! - play: Run local three-player games between agents
//! - suggest: Ask one agent for its action in a saved position

mod play;
mod suggest;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chexers")]
#[command(about = "Three-player Chexers agents")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play local games between three agents
    Play(play::PlayArgs),
    /// Print one agent's action for a position file
    Suggest(suggest::SuggestArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Suggest(args) => suggest::run(args, cli.seed),
    }
}
