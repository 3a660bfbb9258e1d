//! Chexers Core - Game engine and search agents
//!
//! This crate provides the core logic for three-player Chexers:
//! - Board geometry (radius-3 hex grid with axial coordinates)
//! - Board state, move generation and state transitions
//! - Static evaluation for all three players
//! - Single-agent A* and three-player Maxn search
//! - The agent that keeps its board in sync and picks actions

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod strategy;
pub mod astar;
pub mod maxn;
pub mod random;
pub mod agent;
pub mod config;

// Re-exports for convenient access
pub use board::{Hex, DIRECTIONS, BOARD_RADIUS};
pub use error::ChexersError;
pub use game::{Action, Board, ExitCounts, Player, PlayerConfig, Snapshot, WINNING_EXITS};
pub use eval::{evaluate, Scores, Weights};
pub use strategy::{SearchContext, SearchStrategy};
pub use astar::{AStar, TargetMode};
pub use maxn::{Maxn, CUTOFF_DEPTH};
pub use random::RandomPlayer;
pub use agent::Agent;
pub use config::{AgentConfig, StrategyKind};
