//! Random baseline player

use crate::game::{Action, Board, Player};
use crate::strategy::{SearchContext, SearchStrategy};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Exits whenever it can, otherwise moves a random piece to a random legal cell
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl SearchStrategy for RandomPlayer {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_action(&mut self, board: &Board, player: Player, _context: &SearchContext) -> Action {
        let pieces = board.pieces_of(player);

        if let Some(&from) = pieces.iter().find(|&&hex| player.is_exit(hex)) {
            return Action::Exit { from };
        }

        let movable: Vec<Vec<Action>> = pieces
            .into_iter()
            .map(|from| {
                board
                    .legal_destinations(from)
                    .into_iter()
                    .flatten()
                    .filter_map(|to| Action::classify(Some(from), Some(to)))
                    .collect::<Vec<_>>()
            })
            .filter(|actions| !actions.is_empty())
            .collect();

        movable
            .choose(&mut self.rng)
            .and_then(|actions| actions.choose(&mut self.rng))
            .copied()
            .unwrap_or(Action::Pass)
    }
}
