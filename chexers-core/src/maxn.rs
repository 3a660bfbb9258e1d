//! Maxn search for three players
//!
//! Depth-limited generalisation of minimax: every node belongs to one player,
//! who picks the child whose score vector is best in its own component. There
//! is no pruning. Children are visited by playing an action on a shared board
//! and undoing it afterwards.

use crate::eval::{evaluate, Scores};
use crate::game::{Action, Board, ExitCounts, Player, WINNING_EXITS};
use crate::strategy::{SearchContext, SearchStrategy};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default plies searched before falling back to static evaluation
pub const CUTOFF_DEPTH: u32 = 3;

// ============================================================================
// MAXN
// ============================================================================

/// Maxn searcher
#[derive(Clone, Copy, Debug)]
pub struct Maxn {
    pub cutoff_depth: u32,
}

impl Default for Maxn {
    fn default() -> Self {
        Self {
            cutoff_depth: CUTOFF_DEPTH,
        }
    }
}

/// Stop at the depth limit or once anyone has won
pub fn should_cutoff(depth: u32, exits: &ExitCounts, cutoff_depth: u32) -> bool {
    depth >= cutoff_depth || Player::ALL.iter().any(|&p| exits.get(p) >= WINNING_EXITS)
}

impl Maxn {
    pub fn new(cutoff_depth: u32) -> Self {
        Self { cutoff_depth }
    }

    /// Best action for `player` from `board`, with the backed-up score vector
    pub fn search(&self, board: &Board, player: Player, exits: &ExitCounts) -> (Scores, Option<Action>) {
        let mut scratch = board.clone();
        let mut nodes = 0usize;
        let (scores, action) = maxn_recursive(&mut scratch, player, 0, *exits, self.cutoff_depth, &mut nodes);

        tracing::debug!(
            "Maxn for {} visited {} nodes, chose {:?} with scores {:?}",
            player,
            nodes,
            action,
            scores
        );
        (scores, action)
    }

    /// One Maxn node. `board` is restored before returning.
    pub fn maxn(
        &self,
        board: &mut Board,
        player: Player,
        depth: u32,
        exits: ExitCounts,
    ) -> (Scores, Option<Action>) {
        let mut nodes = 0usize;
        maxn_recursive(board, player, depth, exits, self.cutoff_depth, &mut nodes)
    }
}

fn maxn_recursive(
    board: &mut Board,
    player: Player,
    depth: u32,
    exits: ExitCounts,
    cutoff_depth: u32,
    nodes: &mut usize,
) -> (Scores, Option<Action>) {
    *nodes += 1;

    if should_cutoff(depth, &exits, cutoff_depth) {
        return (evaluate(board, &exits), None);
    }

    let mut actions = board.legal_actions(player);
    if actions.is_empty() {
        actions.push(Action::Pass);
    }

    let index = player.index();
    let mut best = [f32::NEG_INFINITY; 3];
    let mut best_action = None;

    for action in actions {
        let child_exits = if action.is_exit() {
            exits.with_exit(player)
        } else {
            exits
        };

        let undo = board.play(action);
        let (scores, _) = maxn_recursive(board, player.next(), depth + 1, child_exits, cutoff_depth, nodes);
        board.unplay(undo);

        if scores[index] > best[index] {
            best = scores;
            best_action = Some(action);
        }
    }

    (best, best_action)
}

impl SearchStrategy for Maxn {
    fn name(&self) -> &'static str {
        "maxn"
    }

    fn choose_action(&mut self, board: &Board, player: Player, context: &SearchContext) -> Action {
        self.search(board, player, &context.exits)
            .1
            .unwrap_or(Action::Pass)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;

    fn skirmish() -> Board {
        Board::from_pieces([
            (Hex::new(-1, 0), Player::Red),
            (Hex::new(-2, 1), Player::Red),
            (Hex::new(0, 0), Player::Green),
            (Hex::new(1, -2), Player::Green),
            (Hex::new(0, 2), Player::Blue),
            (Hex::new(2, 0), Player::Blue),
        ])
    }

    #[test]
    fn test_cutoff_on_depth_and_win() {
        let exits = ExitCounts::default();
        assert!(!should_cutoff(0, &exits, CUTOFF_DEPTH));
        assert!(!should_cutoff(2, &exits, CUTOFF_DEPTH));
        assert!(should_cutoff(3, &exits, CUTOFF_DEPTH));

        let won = ExitCounts::new([0, 4, 0]);
        for depth in 0..CUTOFF_DEPTH {
            assert!(should_cutoff(depth, &won, CUTOFF_DEPTH));
        }
    }

    #[test]
    fn test_leaf_returns_evaluation() {
        let maxn = Maxn::default();
        let mut board = skirmish();
        let exits = ExitCounts::default();
        let (scores, action) = maxn.maxn(&mut board, Player::Red, CUTOFF_DEPTH, exits);
        assert_eq!(scores, evaluate(&board, &exits));
        assert!(action.is_none());
    }

    #[test]
    fn test_one_ply_matches_brute_force() {
        let maxn = Maxn::new(1);
        let board = skirmish();
        let exits = ExitCounts::default();
        let (scores, action) = maxn.search(&board, Player::Red, &exits);

        let best = board
            .legal_actions(Player::Red)
            .into_iter()
            .map(|a| evaluate(&board.apply(a), &exits)[Player::Red.index()])
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(scores[Player::Red.index()], best);

        let chosen = board.apply(action.unwrap());
        assert_eq!(evaluate(&chosen, &exits), scores);
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let maxn = Maxn::default();
        let mut board = skirmish();
        let before = board.clone();
        maxn.maxn(&mut board, Player::Green, 0, ExitCounts::default());
        assert_eq!(board, before);
    }

    #[test]
    fn test_only_exit_is_chosen() {
        let board = Board::from_pieces([
            (Hex::new(3, -3), Player::Red),
            (Hex::new(3, -2), Player::Green),
            (Hex::new(3, -1), Player::Green),
            (Hex::new(2, -2), Player::Blue),
            (Hex::new(1, -1), Player::Blue),
            (Hex::new(2, -3), Player::Green),
            (Hex::new(1, -3), Player::Green),
        ]);
        let mut maxn = Maxn::default();
        let action = maxn.choose_action(&board, Player::Red, &SearchContext::default());
        assert_eq!(action, Action::Exit { from: Hex::new(3, -3) });
    }

    #[test]
    fn test_forced_pass() {
        let board = Board::from_pieces([(Hex::new(0, 0), Player::Green)]);
        let (scores, action) = Maxn::default().search(&board, Player::Red, &ExitCounts::default());
        assert_eq!(action, Some(Action::Pass));
        assert!(scores.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_exit_counts_only_in_branch() {
        // Red's only move is an exit that wins the game; the win stops the search
        let board = Board::from_pieces([
            (Hex::new(3, -3), Player::Red),
            (Hex::new(3, -2), Player::Green),
            (Hex::new(3, -1), Player::Green),
            (Hex::new(2, -2), Player::Blue),
            (Hex::new(1, -1), Player::Blue),
            (Hex::new(2, -3), Player::Green),
            (Hex::new(1, -3), Player::Green),
        ]);
        let exits = ExitCounts::new([3, 0, 0]);
        let (scores, action) = Maxn::default().search(&board, Player::Red, &exits);
        assert_eq!(action, Some(Action::Exit { from: Hex::new(3, -3) }));

        let after = board.apply(Action::Exit { from: Hex::new(3, -3) });
        assert_eq!(scores, evaluate(&after, &exits.with_exit(Player::Red)));
        assert_eq!(exits.get(Player::Red), 3);
    }
}
