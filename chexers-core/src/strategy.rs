//! Pluggable action selection

use crate::game::{Action, Board, ExitCounts, Player};

/// Game facts a strategy may need beyond the board itself
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchContext {
    pub exits: ExitCounts,
}

/// Picks one action for `player` on `board`.
///
/// Implementations never fail: with nothing better to do they return
/// `Action::Pass`.
pub trait SearchStrategy {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    fn choose_action(&mut self, board: &Board, player: Player, context: &SearchContext) -> Action;
}
