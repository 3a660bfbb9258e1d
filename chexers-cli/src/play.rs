//! Play command - run local three-player games between configured agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_configs(), play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use chexers_core::{
    Action, Agent, AgentConfig, Board, ExitCounts, Player, StrategyKind, TargetMode, CUTOFF_DEPTH,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Strategy for red
    #[arg(long, default_value = "maxn")]
    pub red: StrategyKind,

    /// Strategy for green
    #[arg(long, default_value = "maxn")]
    pub green: StrategyKind,

    /// Strategy for blue
    #[arg(long, default_value = "maxn")]
    pub blue: StrategyKind,

    /// Agent config JSON for red (overrides --red)
    #[arg(long, value_name = "FILE")]
    pub red_config: Option<PathBuf>,

    /// Agent config JSON for green (overrides --green)
    #[arg(long, value_name = "FILE")]
    pub green_config: Option<PathBuf>,

    /// Agent config JSON for blue (overrides --blue)
    #[arg(long, value_name = "FILE")]
    pub blue_config: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Turns per player before the game is drawn
    #[arg(long, default_value = "256")]
    pub max_turns: u32,

    /// Maxn cutoff depth
    #[arg(long, default_value_t = CUTOFF_DEPTH)]
    pub depth: u32,

    /// A* expansion budget per action
    #[arg(long)]
    pub max_expansions: Option<usize>,

    /// Aim A* at corner exits only
    #[arg(long)]
    pub corners: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    winner: Option<Player>,
    exits: ExitCounts,
    strategies: [&'static str; 3],
    actions: Vec<(Player, Action)>,
}

impl GameRecord {
    fn turns(&self) -> usize {
        self.actions.len()
    }
}

/// Aggregated results
#[derive(Clone, Debug)]
struct PlayResults {
    games: Vec<GameRecord>,
    wins: [usize; 3],
    draws: usize,
    avg_turns: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve one agent config per colour
/// 2. Play the games
/// 3. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let configs = load_configs(&args)?;

    tracing::info!(
        "Starting {} game(s): red={:?} green={:?} blue={:?}",
        args.games,
        configs[0].strategy,
        configs[1].strategy,
        configs[2].strategy
    );

    let results = play_games(&configs, &args, seed);

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build a config per colour from flags or files
fn load_configs(args: &PlayArgs) -> Result<[AgentConfig; 3]> {
    let from_flags = |colour: Player, kind: StrategyKind| {
        let mut config = AgentConfig::new(colour, kind);
        config.cutoff_depth = args.depth;
        config.max_expansions = args.max_expansions;
        if args.corners {
            config = config.with_targets(TargetMode::Corners);
        }
        config
    };

    let resolve = |colour: Player, kind: StrategyKind, file: &Option<PathBuf>| -> Result<AgentConfig> {
        match file {
            Some(path) => {
                let mut config = AgentConfig::load(path)
                    .with_context(|| format!("Failed to load {} config: {}", colour, path.display()))?;
                if config.colour != colour {
                    tracing::warn!("{} config declares {}, playing it as {}", colour, config.colour, colour);
                    config.colour = colour;
                }
                Ok(config)
            }
            None => Ok(from_flags(colour, kind)),
        }
    };

    Ok([
        resolve(Player::Red, args.red, &args.red_config)?,
        resolve(Player::Green, args.green, &args.green_config)?,
        resolve(Player::Blue, args.blue, &args.blue_config)?,
    ])
}

/// Play all games
fn play_games(configs: &[AgentConfig; 3], args: &PlayArgs, seed: Option<u64>) -> PlayResults {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let seeded = configs.clone().map(|config| match config.seed {
            Some(_) => config,
            None => config.with_seed(rng.gen()),
        });

        let record = play_single_game(&seeded, game_num + 1, args.max_turns);

        tracing::info!(
            "Game {}: {} after {} turns, exits {:?}",
            record.game_number,
            describe_winner(record.winner),
            record.turns(),
            record.exits
        );

        games.push(record);
    }

    compute_statistics(games)
}

/// Report results
fn report_results(results: &PlayResults, args: &PlayArgs) -> Result<()> {
    if args.json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; every agent hears about every accepted action
fn play_single_game(configs: &[AgentConfig; 3], game_number: usize, max_turns: u32) -> GameRecord {
    let mut agents: Vec<Agent> = configs.iter().map(AgentConfig::build).collect();
    let strategies = [
        agents[0].strategy_name(),
        agents[1].strategy_name(),
        agents[2].strategy_name(),
    ];

    let mut board = Board::starting();
    let mut exits = ExitCounts::default();
    let mut actions = Vec::new();
    let mut current = Player::Red;
    let max_actions = max_turns as usize * Player::ALL.len();

    while exits.winner().is_none() && actions.len() < max_actions {
        let action = agents[current.index()].action();

        board.play(action);
        if action.is_exit() {
            exits.increment(current);
        }
        for agent in agents.iter_mut() {
            agent.update(current, action);
        }

        tracing::debug!("{}: {}", current, action);
        actions.push((current, action));
        current = current.next();
    }

    if agents.iter().any(|agent| agent.board() != &board) {
        tracing::warn!("Game {}: agent boards drifted from the shared board", game_number);
    }

    GameRecord {
        game_number,
        winner: exits.winner(),
        exits,
        strategies,
        actions,
    }
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> PlayResults {
    let mut wins = [0usize; 3];
    for winner in games.iter().filter_map(|g| g.winner) {
        wins[winner.index()] += 1;
    }
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    let total_turns: usize = games.iter().map(GameRecord::turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    PlayResults {
        games,
        wins,
        draws,
        avg_turns,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn describe_winner(winner: Option<Player>) -> String {
    match winner {
        Some(player) => format!("{} wins", player),
        None => "draw".to_string(),
    }
}

/// Print results as JSON
fn print_json_results(results: &PlayResults) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame<'a> {
        game_number: usize,
        winner: Option<Player>,
        turns: usize,
        exits: ExitCounts,
        strategies: [&'static str; 3],
        actions: &'a [(Player, Action)],
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        total_games: usize,
        red_wins: usize,
        green_wins: usize,
        blue_wins: usize,
        draws: usize,
        avg_turns: f32,
        games: Vec<JsonGame<'a>>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        red_wins: results.wins[Player::Red.index()],
        green_wins: results.wins[Player::Green.index()],
        blue_wins: results.wins[Player::Blue.index()],
        draws: results.draws,
        avg_turns: results.avg_turns,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                turns: g.turns(),
                exits: g.exits,
                strategies: g.strategies,
                actions: &g.actions,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize results")?;
    println!("{}", json);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &PlayResults) {
    let total = results.games.len();
    let percent = |count: usize| {
        if total > 0 {
            count as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    };

    println!("\n=== Results ===");
    println!("Total games: {}", total);
    for player in Player::ALL {
        let wins = results.wins[player.index()];
        println!("{:<6} wins: {} ({:.1}%)", player, wins, percent(wins));
    }
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws));
    println!("Avg turns:   {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} [{}/{}/{}]: {} in {} turns, exits {:?}",
            game.game_number,
            game.strategies[0],
            game.strategies[1],
            game.strategies[2],
            describe_winner(game.winner),
            game.turns(),
            game.exits
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
