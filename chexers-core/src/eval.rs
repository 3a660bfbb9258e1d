//! Static position evaluation
//!
//! Each player gets an independent score built from four components: how
//! close its pieces are to its exits, how many pieces have exited, whether its
//! piece count matches the exits still owed, and how many of its pieces sit
//! next to an enemy.

use crate::board::Hex;
use crate::game::{Board, ExitCounts, Player, WINNING_EXITS};
use serde::{Deserialize, Serialize};

/// Upper bound on any exit distance (board diameter + 1)
pub const MAX_DISTANCE: i8 = 7;

/// Mean distance assumed for a player with no pieces
const NEUTRAL_DISTANCE: f32 = MAX_DISTANCE as f32 / 2.0;

const DIST_SCALE: f32 = 10.0 / 7.0;
const EXIT_SCALE: f32 = 10.0 / 4.0;
const PIECE_SCALE: f32 = 10.0;

/// One score per player, indexed by `Player::index`
pub type Scores = [f32; 3];

/// Component weights for one player's score
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub distance: f32,
    pub exit: f32,
    pub piece: f32,
    pub capture: f32,
}

impl Weights {
    pub const BALANCED: Weights = Weights { distance: 4.0, exit: 3.0, piece: 2.0, capture: 1.0 };

    /// Fewer than four pieces left to win with
    pub const ENDANGERED: Weights = Weights { distance: 2.0, exit: 3.0, piece: 5.0, capture: 3.0 };

    /// More than five pieces plus exits
    pub const THRIVING: Weights = Weights { distance: 2.0, exit: 2.0, piece: 4.0, capture: 1.0 };

    /// Pick weights from pieces on board plus pieces already exited
    pub fn for_standing(pieces: usize, exits: u8) -> Self {
        let standing = pieces + exits as usize;
        if standing < WINNING_EXITS as usize {
            Self::ENDANGERED
        } else if standing > WINNING_EXITS as usize + 1 {
            Self::THRIVING
        } else {
            Self::BALANCED
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Distance from `hex` to the closest of `targets`
pub fn nearest_distance(hex: Hex, targets: &[Hex]) -> i8 {
    targets
        .iter()
        .map(|&target| hex.distance_to(target))
        .fold(MAX_DISTANCE, i8::min)
}

/// Average distance from a player's pieces to its nearest exit
pub fn mean_exit_distance(board: &Board, player: Player) -> f32 {
    let exits = &player.config().exits;
    let (total, count) = board
        .pieces()
        .filter(|&(_, owner)| owner == player)
        .fold((0i32, 0usize), |(total, count), (hex, _)| {
            (total + nearest_distance(hex, exits) as i32, count + 1)
        });

    if count == 0 {
        return NEUTRAL_DISTANCE;
    }
    total as f32 / count as f32
}

pub fn distance_score(board: &Board, player: Player) -> f32 {
    (MAX_DISTANCE as f32 - mean_exit_distance(board, player)) * DIST_SCALE
}

pub fn exit_score(exits: &ExitCounts, player: Player) -> f32 {
    exits.get(player) as f32 * EXIT_SCALE
}

/// Peaks when the pieces on board exactly cover the exits still owed
pub fn piece_score(board: &Board, exits: &ExitCounts, player: Player) -> f32 {
    let owed = (WINNING_EXITS as f32) - exits.get(player) as f32;
    let ratio = owed / board.count(player).max(1) as f32;
    (1.0 - (1.0 - ratio).abs()).max(0.0) * PIECE_SCALE
}

/// Count of (own piece, adjacent enemy piece) pairs
pub fn capture_exposure(board: &Board, player: Player) -> usize {
    board
        .pieces()
        .filter(|&(_, owner)| owner == player)
        .map(|(hex, _)| {
            hex.neighbors()
                .filter(|&n| matches!(board.get(n), Some(other) if other != player))
                .count()
        })
        .sum()
}

/// Score one player's position
pub fn evaluate_player(board: &Board, exits: &ExitCounts, player: Player) -> f32 {
    let weights = Weights::for_standing(board.count(player), exits.get(player));

    weights.distance * distance_score(board, player)
        + weights.exit * exit_score(exits, player)
        + weights.piece * piece_score(board, exits, player)
        + weights.capture * capture_exposure(board, player) as f32
}

/// Score every player's position
pub fn evaluate(board: &Board, exits: &ExitCounts) -> Scores {
    Player::ALL.map(|player| evaluate_player(board, exits, player))
}
