//! Agent configuration

use crate::agent::Agent;
use crate::astar::{AStar, TargetMode};
use crate::error::ChexersError;
use crate::game::Player;
use crate::maxn::{Maxn, CUTOFF_DEPTH};
use crate::random::RandomPlayer;
use crate::strategy::SearchStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Search strategy selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Single-agent A* toward the exits
    #[default]
    AStar,
    /// Three-player Maxn
    Maxn,
    /// Random legal moves
    Random,
}

impl FromStr for StrategyKind {
    type Err = ChexersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(StrategyKind::AStar),
            "maxn" => Ok(StrategyKind::Maxn),
            "random" => Ok(StrategyKind::Random),
            _ => Err(ChexersError::UnknownStrategy(s.to_string())),
        }
    }
}

/// How to build one agent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub colour: Player,
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Maxn plies before static evaluation
    #[serde(default = "default_cutoff_depth")]
    pub cutoff_depth: u32,
    /// A* heuristic targets
    #[serde(default)]
    pub targets: TargetMode,
    /// A* expansion budget (None = unbounded)
    #[serde(default)]
    pub max_expansions: Option<usize>,
    /// RNG seed for the random player (None = random)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_cutoff_depth() -> u32 {
    CUTOFF_DEPTH
}

impl AgentConfig {
    pub fn new(colour: Player, strategy: StrategyKind) -> Self {
        Self {
            colour,
            strategy,
            cutoff_depth: CUTOFF_DEPTH,
            targets: TargetMode::default(),
            max_expansions: None,
            seed: None,
        }
    }

    /// A* agent
    pub fn astar(colour: Player) -> Self {
        Self::new(colour, StrategyKind::AStar)
    }

    /// Maxn agent at the given cutoff depth
    pub fn maxn(colour: Player, cutoff_depth: u32) -> Self {
        Self {
            cutoff_depth,
            ..Self::new(colour, StrategyKind::Maxn)
        }
    }

    /// Random agent
    pub fn random(colour: Player) -> Self {
        Self::new(colour, StrategyKind::Random)
    }

    /// Aim the A* heuristic at the corner exits
    pub fn with_targets(mut self, targets: TargetMode) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn build_strategy(&self) -> Box<dyn SearchStrategy> {
        match self.strategy {
            StrategyKind::AStar => Box::new(AStar {
                mode: self.targets,
                max_expansions: self.max_expansions,
            }),
            StrategyKind::Maxn => Box::new(Maxn::new(self.cutoff_depth)),
            StrategyKind::Random => Box::new(RandomPlayer::new(self.seed.unwrap_or_else(rand::random))),
        }
    }

    /// Agent at the starting position
    pub fn build(&self) -> Agent {
        Agent::new(self.colour, self.build_strategy())
    }
}
