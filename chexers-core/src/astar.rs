//! Single-agent A* search
//!
//! Treats the other players' pieces as fixed obstacles and searches for the
//! shortest sequence of own actions that takes every one of the player's
//! pieces off the board. Nodes are board snapshots; the action taken along an
//! edge is recovered afterwards by diffing consecutive snapshots.
//!
//! Whenever the node being expanded has a piece resting on one of its exits,
//! that piece is exited straight away and the resulting node restarts with a
//! cost of zero. This deliberately departs from textbook A* cost accounting.

use crate::board::Hex;
use crate::eval::nearest_distance;
use crate::game::{Action, Board, Player, Snapshot};
use crate::strategy::{SearchContext, SearchStrategy};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// ============================================================================
// HEURISTIC
// ============================================================================

/// Which cells the heuristic measures distance to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// All four exit cells (admissible without jumps)
    #[default]
    Exits,
    /// Only the two corner exits
    Corners,
}

impl TargetMode {
    pub fn targets(self, player: Player) -> &'static [Hex] {
        let config = player.config();
        match self {
            TargetMode::Exits => &config.exits,
            TargetMode::Corners => &config.corners,
        }
    }
}

/// Sum over the player's pieces of (distance to nearest target + 1)
pub fn heuristic(state: &Snapshot, player: Player, targets: &[Hex]) -> u32 {
    state
        .pieces()
        .iter()
        .filter(|&&(_, owner)| owner == player)
        .map(|&(hex, _)| nearest_distance(hex, targets) as u32 + 1)
        .sum()
}

// ============================================================================
// OPEN SET
// ============================================================================

struct OpenNode {
    f: u32,
    seq: u64,
    state: Snapshot,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    // Max-heap: lowest f first, most recently pushed first among ties
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then(self.seq.cmp(&other.seq))
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// A* searcher for one player
#[derive(Clone, Debug, Default)]
pub struct AStar {
    pub mode: TargetMode,
    /// Give up after this many expansions
    pub max_expansions: Option<usize>,
}

/// A path of snapshots from the start to a board with none of the player's
/// pieces left
#[derive(Clone, Debug)]
pub struct Solution {
    pub path: Vec<Snapshot>,
    pub expansions: usize,
}

impl Solution {
    /// Number of actions along the path
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The action leading out of the start board, or Pass if there is none
    pub fn first_action(&self) -> Action {
        match self.path.as_slice() {
            [start, next, ..] => start
                .to_board()
                .action_to(&next.to_board())
                .unwrap_or(Action::Pass),
            _ => Action::Pass,
        }
    }

    /// Every action along the path
    pub fn actions(&self) -> Vec<Action> {
        self.path
            .windows(2)
            .map(|pair| {
                pair[0]
                    .to_board()
                    .action_to(&pair[1].to_board())
                    .unwrap_or(Action::Pass)
            })
            .collect()
    }
}

impl AStar {
    pub fn new(mode: TargetMode) -> Self {
        Self {
            mode,
            max_expansions: None,
        }
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    /// Search from `board` until `player` has no pieces left
    pub fn solve(&self, board: &Board, player: Player) -> Option<Solution> {
        let targets = self.mode.targets(player);
        let h = |state: &Snapshot| heuristic(state, player, targets);

        let start = board.snapshot();
        let mut open = BinaryHeap::new();
        let mut closed: FxHashSet<Snapshot> = FxHashSet::default();
        let mut came_from: FxHashMap<Snapshot, Snapshot> = FxHashMap::default();
        let mut g_cost: FxHashMap<Snapshot, u32> = FxHashMap::default();
        let mut seq = 0u64;
        let mut expansions = 0usize;

        g_cost.insert(start.clone(), 0);
        open.push(OpenNode {
            f: h(&start),
            seq,
            state: start,
        });

        while let Some(OpenNode { state, .. }) = open.pop() {
            if closed.contains(&state) {
                continue;
            }

            let Some(current) = exit_resting_pieces(state, player, &closed, &mut came_from, &mut g_cost)
            else {
                continue;
            };

            if current.count(player) == 0 {
                let path = reconstruct_path(&came_from, current);
                tracing::debug!(
                    "A* for {} solved in {} actions after {} expansions",
                    player,
                    path.len().saturating_sub(1),
                    expansions
                );
                return Some(Solution { path, expansions });
            }

            if closed.contains(&current) {
                continue;
            }
            closed.insert(current.clone());
            expansions += 1;
            if self.max_expansions.is_some_and(|limit| expansions > limit) {
                tracing::warn!("A* for {} stopped after {} expansions", player, expansions - 1);
                return None;
            }

            let base = g_cost.get(&current).copied().unwrap_or(0);
            for successor in current.to_board().successors(player) {
                let key = successor.snapshot();
                if closed.contains(&key) {
                    continue;
                }

                let tentative = base + 1;
                if g_cost.get(&key).is_some_and(|&known| tentative >= known) {
                    continue;
                }

                came_from.insert(key.clone(), current.clone());
                g_cost.insert(key.clone(), tentative);
                seq += 1;
                open.push(OpenNode {
                    f: tentative + h(&key),
                    seq,
                    state: key,
                });
            }
        }

        tracing::warn!("A* for {} exhausted the frontier after {} expansions", player, expansions);
        None
    }
}

/// Exit every piece already standing on one of the player's exits, chaining
/// each exit onto the path with its cost reset to zero. Returns `None` when an
/// exit lands on an already expanded node.
fn exit_resting_pieces(
    mut current: Snapshot,
    player: Player,
    closed: &FxHashSet<Snapshot>,
    came_from: &mut FxHashMap<Snapshot, Snapshot>,
    g_cost: &mut FxHashMap<Snapshot, u32>,
) -> Option<Snapshot> {
    while let Some(from) = resting_exit(&current, player) {
        let next = current.to_board().apply(Action::Exit { from }).snapshot();
        if closed.contains(&next) {
            return None;
        }
        came_from.insert(next.clone(), current);
        g_cost.insert(next.clone(), 0);
        current = next;
    }
    Some(current)
}

fn resting_exit(state: &Snapshot, player: Player) -> Option<Hex> {
    state
        .pieces()
        .iter()
        .find(|&&(hex, owner)| owner == player && player.is_exit(hex))
        .map(|&(hex, _)| hex)
}

fn reconstruct_path(came_from: &FxHashMap<Snapshot, Snapshot>, goal: Snapshot) -> Vec<Snapshot> {
    let mut path = vec![goal];
    while let Some(previous) = path.last().and_then(|state| came_from.get(state)) {
        if path.len() > came_from.len() {
            break;
        }
        path.push(previous.clone());
    }
    path.reverse();
    path
}

impl SearchStrategy for AStar {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn choose_action(&mut self, board: &Board, player: Player, _context: &SearchContext) -> Action {
        self.solve(board, player)
            .map(|solution| solution.first_action())
            .unwrap_or(Action::Pass)
    }
}

// ============================================================================
// TESTS
// ============================================================================
