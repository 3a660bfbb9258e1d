//! Suggest command - one agent's action for a saved position
//!
//! Position files list each colour's pieces and the exit tally:
//!
//! ```json
//! {"red": [[-3, 0], [-2, 1]], "green": [[0, -3]], "blue": [], "exits": [1, 0, 2]}
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use chexers_core::{
    Action, Agent, AgentConfig, Board, ExitCounts, Hex, Player, StrategyKind, TargetMode, CUTOFF_DEPTH,
};

#[derive(Args)]
pub struct SuggestArgs {
    /// Position JSON file
    #[arg(long, value_name = "FILE")]
    pub position: PathBuf,

    /// Colour to move
    #[arg(long)]
    pub colour: Player,

    /// Search strategy
    #[arg(long, default_value = "maxn")]
    pub strategy: StrategyKind,

    /// Agent config JSON (overrides --strategy and the tuning flags)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maxn cutoff depth
    #[arg(long, default_value_t = CUTOFF_DEPTH)]
    pub depth: u32,

    /// A* expansion budget
    #[arg(long)]
    pub max_expansions: Option<usize>,

    /// Aim A* at corner exits only
    #[arg(long)]
    pub corners: bool,
}

/// On-disk position
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub red: Vec<Hex>,
    #[serde(default)]
    pub green: Vec<Hex>,
    #[serde(default)]
    pub blue: Vec<Hex>,
    #[serde(default)]
    pub exits: ExitCounts,
}

impl Position {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read position: {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid position file: {}", path.display()))
    }

    pub fn board(&self) -> Board {
        let pieces = [
            (Player::Red, &self.red),
            (Player::Green, &self.green),
            (Player::Blue, &self.blue),
        ];
        let board = Board::from_pieces(
            pieces
                .into_iter()
                .flat_map(|(player, hexes)| hexes.iter().map(move |&hex| (hex, player))),
        );

        let listed = self.red.len() + self.green.len() + self.blue.len();
        if board.total_pieces() != listed {
            tracing::warn!(
                "Position lists {} pieces but {} are on distinct board cells",
                listed,
                board.total_pieces()
            );
        }
        board
    }
}

pub fn run(args: SuggestArgs, seed: Option<u64>) -> Result<()> {
    let position = Position::load(&args.position)?;
    let config = resolve_config(&args, seed)?;

    let action = suggest(&position, &config);
    tracing::info!("{} {}", config.colour, action);

    let json = serde_json::to_string(&action).context("Failed to serialize action")?;
    println!("{}", json);
    Ok(())
}

fn resolve_config(args: &SuggestArgs, seed: Option<u64>) -> Result<AgentConfig> {
    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("Failed to load agent config: {}", path.display()))?,
        None => {
            let mut config = AgentConfig::new(args.colour, args.strategy);
            config.cutoff_depth = args.depth;
            config.max_expansions = args.max_expansions;
            if args.corners {
                config = config.with_targets(TargetMode::Corners);
            }
            config
        }
    };

    config.colour = args.colour;
    if let (None, Some(seed)) = (config.seed, seed) {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Build an agent at `position` and ask it for one action
pub fn suggest(position: &Position, config: &AgentConfig) -> Action {
    let mut agent = Agent::with_position(
        config.colour,
        position.board(),
        position.exits,
        config.build_strategy(),
    );
    agent.action()
}
