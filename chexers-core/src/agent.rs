//! Game-playing agent: owns the board and asks its strategy for actions

use crate::game::{Action, Board, ExitCounts, Player};
use crate::strategy::{SearchContext, SearchStrategy};

/// One player's view of the game
pub struct Agent {
    colour: Player,
    board: Board,
    exits: ExitCounts,
    strategy: Box<dyn SearchStrategy>,
}

impl Agent {
    /// Fresh game from the starting layout
    pub fn new(colour: Player, strategy: Box<dyn SearchStrategy>) -> Self {
        Self::with_position(colour, Board::starting(), ExitCounts::default(), strategy)
    }

    /// Resume from an arbitrary position
    pub fn with_position(
        colour: Player,
        board: Board,
        exits: ExitCounts,
        strategy: Box<dyn SearchStrategy>,
    ) -> Self {
        tracing::info!("{} agent ready using {}", colour, strategy.name());
        Self {
            colour,
            board,
            exits,
            strategy,
        }
    }

    pub fn colour(&self) -> Player {
        self.colour
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn exits(&self) -> &ExitCounts {
        &self.exits
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Choose this turn's action. Does not change the board; the caller
    /// reports the accepted action back through `update`.
    pub fn action(&mut self) -> Action {
        let context = SearchContext { exits: self.exits };
        let action = self.strategy.choose_action(&self.board, self.colour, &context);
        tracing::debug!("{} chose {}", self.colour, action);
        action
    }

    /// Apply any player's accepted action
    pub fn update(&mut self, colour: Player, action: Action) {
        self.board.play(action);
        if action.is_exit() {
            self.exits.increment(colour);
        }
    }
}
