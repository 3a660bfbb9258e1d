//! Board state, actions and state transitions

use crate::board::Hex;
use crate::error::ChexersError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Exits needed to win
pub const WINNING_EXITS: u8 = 4;

/// Off-board holding cell; a piece moved here leaves the board
pub const EXIT_STAGING: Hex = Hex::new(3, 1);

const MOVE_DISTANCE: i8 = 1;
const JUMP_DISTANCE: i8 = 2;

// ============================================================================
// PLAYERS
// ============================================================================

/// Player colour, in turn order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Player {
    pub const ALL: [Player; 3] = [Player::Red, Player::Green, Player::Blue];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Next player in the fixed red -> green -> blue cycle
    pub fn next(self) -> Self {
        match self {
            Player::Red => Player::Green,
            Player::Green => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::Red => "red",
            Player::Green => "green",
            Player::Blue => "blue",
        }
    }

    pub fn config(self) -> &'static PlayerConfig {
        &PLAYER_CONFIGS[self.index()]
    }

    pub fn is_exit(self, hex: Hex) -> bool {
        self.config().exits.contains(&hex)
    }
}

impl FromStr for Player {
    type Err = ChexersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Player::Red),
            "green" => Ok(Player::Green),
            "blue" => Ok(Player::Blue),
            _ => Err(ChexersError::UnknownColour(s.to_string())),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed per-colour cell tables
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub starts: [Hex; 4],
    pub exits: [Hex; 4],
    /// The two exit cells on board corners
    pub corners: [Hex; 2],
}

/// Cell tables indexed by `Player::index`
pub static PLAYER_CONFIGS: [PlayerConfig; 3] = [
    PlayerConfig {
        starts: [Hex::new(-3, 0), Hex::new(-3, 1), Hex::new(-3, 2), Hex::new(-3, 3)],
        exits: [Hex::new(3, -3), Hex::new(3, -2), Hex::new(3, -1), Hex::new(3, 0)],
        corners: [Hex::new(3, -3), Hex::new(3, 0)],
    },
    PlayerConfig {
        starts: [Hex::new(0, -3), Hex::new(1, -3), Hex::new(2, -3), Hex::new(3, -3)],
        exits: [Hex::new(-3, 3), Hex::new(-2, 3), Hex::new(-1, 3), Hex::new(0, 3)],
        corners: [Hex::new(-3, 3), Hex::new(0, 3)],
    },
    PlayerConfig {
        starts: [Hex::new(0, 3), Hex::new(1, 2), Hex::new(2, 1), Hex::new(3, 0)],
        exits: [Hex::new(0, -3), Hex::new(-1, -2), Hex::new(-2, -1), Hex::new(-3, 0)],
        corners: [Hex::new(0, -3), Hex::new(-3, 0)],
    },
];

// ============================================================================
// ACTIONS
// ============================================================================

/// A single turn's action.
///
/// On the wire this is a `(tag, payload)` pair: `["MOVE", [[q,r],[q,r]]]`,
/// `["JUMP", [[q,r],[q,r]]]`, `["EXIT", [q,r]]` or `["PASS", null]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "WireAction", try_from = "WireAction")]
pub enum Action {
    Move { from: Hex, to: Hex },
    Jump { from: Hex, to: Hex },
    Exit { from: Hex },
    Pass,
}

impl Action {
    /// Classify a (source, destination) pair the way a board diff reports it.
    /// Returns `None` when the pair is neither a step nor a jump apart.
    pub fn classify(from: Option<Hex>, to: Option<Hex>) -> Option<Action> {
        match (from, to) {
            (None, _) => Some(Action::Pass),
            (Some(from), None) => Some(Action::Exit { from }),
            (Some(from), Some(to)) => match from.distance_to(to) {
                MOVE_DISTANCE => Some(Action::Move { from, to }),
                JUMP_DISTANCE => Some(Action::Jump { from, to }),
                _ => None,
            },
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Action::Move { .. } => "MOVE",
            Action::Jump { .. } => "JUMP",
            Action::Exit { .. } => "EXIT",
            Action::Pass => "PASS",
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Action::Exit { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { from, to } | Action::Jump { from, to } => {
                write!(f, "{} from {} to {}.", self.tag(), from, to)
            }
            Action::Exit { from } => write!(f, "EXIT from {}.", from),
            Action::Pass => f.write_str("PASS."),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireAction(String, Option<WirePayload>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Path(Hex, Hex),
    Cell(Hex),
}

impl From<Action> for WireAction {
    fn from(action: Action) -> Self {
        let payload = match action {
            Action::Move { from, to } | Action::Jump { from, to } => Some(WirePayload::Path(from, to)),
            Action::Exit { from } => Some(WirePayload::Cell(from)),
            Action::Pass => None,
        };
        WireAction(action.tag().to_string(), payload)
    }
}

impl TryFrom<WireAction> for Action {
    type Error = ChexersError;

    fn try_from(WireAction(tag, payload): WireAction) -> Result<Self, Self::Error> {
        let mismatch = || ChexersError::PayloadMismatch { tag: tag.clone() };
        match (tag.as_str(), payload) {
            ("MOVE", Some(WirePayload::Path(from, to))) => Ok(Action::Move { from, to }),
            ("JUMP", Some(WirePayload::Path(from, to))) => Ok(Action::Jump { from, to }),
            ("EXIT", Some(WirePayload::Cell(from))) => Ok(Action::Exit { from }),
            ("PASS", None) => Ok(Action::Pass),
            ("MOVE" | "JUMP" | "EXIT" | "PASS", _) => Err(mismatch()),
            _ => Err(ChexersError::UnknownTag(tag.clone())),
        }
    }
}

// ============================================================================
// EXIT COUNTERS
// ============================================================================

/// Pieces exited so far, per player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitCounts([u8; 3]);

impl ExitCounts {
    pub fn new(counts: [u8; 3]) -> Self {
        Self(counts)
    }

    pub fn get(&self, player: Player) -> u8 {
        self.0[player.index()]
    }

    pub fn increment(&mut self, player: Player) {
        self.0[player.index()] += 1;
    }

    /// Copy with one more exit for `player`
    pub fn with_exit(mut self, player: Player) -> Self {
        self.increment(player);
        self
    }

    /// First player to have reached the winning exit count
    pub fn winner(&self) -> Option<Player> {
        Player::ALL.into_iter().find(|&p| self.get(p) >= WINNING_EXITS)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Sparse occupancy map: hex -> owning player
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: FxHashMap<Hex, Player>,
}

/// Everything needed to reverse one `Board::play`
#[derive(Clone, Copy, Debug)]
pub struct Undo {
    action: Action,
    mover: Option<Player>,
    jumped: Option<(Hex, Option<Player>)>,
    displaced: Option<Player>,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed opening layout, four pieces per player
    pub fn starting() -> Self {
        Self::from_pieces(
            Player::ALL
                .into_iter()
                .flat_map(|p| p.config().starts.into_iter().map(move |hex| (hex, p))),
        )
    }

    /// Build a board from pieces; off-board cells are dropped
    pub fn from_pieces(pieces: impl IntoIterator<Item = (Hex, Player)>) -> Self {
        let cells = pieces
            .into_iter()
            .filter(|(hex, _)| hex.is_on_board())
            .collect();
        Self { cells }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn get(&self, hex: Hex) -> Option<Player> {
        self.cells.get(&hex).copied()
    }

    /// On the board and unoccupied
    pub fn is_empty(&self, hex: Hex) -> bool {
        hex.is_on_board() && !self.cells.contains_key(&hex)
    }

    /// Iterate pieces (unordered)
    pub fn pieces(&self) -> impl Iterator<Item = (Hex, Player)> + '_ {
        self.cells.iter().map(|(&hex, &player)| (hex, player))
    }

    /// A player's pieces in coordinate order
    pub fn pieces_of(&self, player: Player) -> Vec<Hex> {
        let mut hexes: Vec<Hex> = self
            .pieces()
            .filter(|&(_, owner)| owner == player)
            .map(|(hex, _)| hex)
            .collect();
        hexes.sort_unstable();
        hexes
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells.values().filter(|&&owner| owner == player).count()
    }

    pub fn total_pieces(&self) -> usize {
        self.cells.len()
    }

    /// Order-independent, hashable copy of the occupancy
    pub fn snapshot(&self) -> Snapshot {
        let mut pieces: Vec<(Hex, Player)> = self.pieces().collect();
        pieces.sort_unstable();
        Snapshot(pieces)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// One destination per direction: a step if the neighbour is empty, else a
    /// jump if the cell beyond is empty, else nothing.
    pub fn legal_destinations(&self, from: Hex) -> [Option<Hex>; 6] {
        let mut destinations = [None; 6];
        for (dir, slot) in destinations.iter_mut().enumerate() {
            let step = from.step(dir, MOVE_DISTANCE);
            if self.is_empty(step) {
                *slot = Some(step);
                continue;
            }
            let jump = from.step(dir, JUMP_DISTANCE);
            if self.is_empty(jump) {
                *slot = Some(jump);
            }
        }
        destinations
    }

    /// Every action available to `player`, piece by piece in coordinate order.
    /// Empty when the player is forced to pass.
    pub fn legal_actions(&self, player: Player) -> Vec<Action> {
        let mut actions = Vec::new();
        for from in self.pieces_of(player) {
            if player.is_exit(from) {
                actions.push(Action::Exit { from });
            }
            for to in self.legal_destinations(from).into_iter().flatten() {
                if from.distance_to(to) == MOVE_DISTANCE {
                    actions.push(Action::Move { from, to });
                } else {
                    actions.push(Action::Jump { from, to });
                }
            }
        }
        actions
    }

    /// Boards reachable by `player` in one action. A forced pass yields the
    /// unchanged board.
    pub fn successors(&self, player: Player) -> Vec<Board> {
        let actions = self.legal_actions(player);
        if actions.is_empty() {
            return vec![self.clone()];
        }
        actions.into_iter().map(|action| self.apply(action)).collect()
    }

    // ========================================================================
    // APPLY ACTION
    // ========================================================================

    /// Apply action, return new board
    pub fn apply(&self, action: Action) -> Self {
        let mut next = self.clone();
        next.play(action);
        next
    }

    /// Apply action in place, returning what is needed to take it back
    pub fn play(&mut self, action: Action) -> Undo {
        let mut undo = Undo {
            action,
            mover: None,
            jumped: None,
            displaced: None,
        };

        match action {
            Action::Pass => {}

            Action::Exit { from } => {
                undo.mover = self.cells.remove(&from);
                if undo.mover.is_none() {
                    tracing::warn!("Exit from empty cell {}", from);
                }
            }

            Action::Move { from, to } | Action::Jump { from, to } => {
                let Some(owner) = self.cells.remove(&from) else {
                    tracing::warn!("{} has no piece to move", from);
                    return undo;
                };
                undo.mover = Some(owner);

                if let Action::Jump { .. } = action {
                    match from.jumped_over(to) {
                        Some(mid) => undo.jumped = Some((mid, self.cells.insert(mid, owner))),
                        None => tracing::warn!("{} to {} is not a jump", from, to),
                    }
                }

                if to != EXIT_STAGING {
                    undo.displaced = self.cells.insert(to, owner);
                }
            }
        }

        undo
    }

    /// Reverse a `play` made on this exact board
    pub fn unplay(&mut self, undo: Undo) {
        let Some(owner) = undo.mover else {
            return;
        };

        match undo.action {
            Action::Pass => {}

            Action::Exit { from } => {
                self.cells.insert(from, owner);
            }

            Action::Move { from, to } | Action::Jump { from, to } => {
                if to != EXIT_STAGING {
                    restore(&mut self.cells, to, undo.displaced);
                }
                if let Some((mid, previous)) = undo.jumped {
                    restore(&mut self.cells, mid, previous);
                }
                self.cells.insert(from, owner);
            }
        }
    }

    // ========================================================================
    // DIFF
    // ========================================================================

    /// The (source, destination) of the change from `self` to `other`.
    ///
    /// The source is a cell occupied here but not there. The destination is a
    /// cell occupied there but not here, left `None` when the piece count
    /// dropped (an exit) or nothing moved.
    pub fn diff(&self, other: &Board) -> (Option<Hex>, Option<Hex>) {
        let from = self
            .cells
            .keys()
            .filter(|hex| !other.cells.contains_key(hex))
            .min()
            .copied();

        if from.is_none() || other.total_pieces() < self.total_pieces() {
            return (from, None);
        }

        let to = other
            .cells
            .keys()
            .filter(|hex| !self.cells.contains_key(hex))
            .min()
            .copied();
        (from, to)
    }

    /// Reconstruct the action turning `self` into `other`
    pub fn action_to(&self, other: &Board) -> Option<Action> {
        let (from, to) = self.diff(other);
        Action::classify(from, to)
    }
}

fn restore(cells: &mut FxHashMap<Hex, Player>, hex: Hex, previous: Option<Player>) {
    match previous {
        Some(player) => {
            cells.insert(hex, player);
        }
        None => {
            cells.remove(&hex);
        }
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Sorted (hex, player) list; usable as a search-graph key
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot(Vec<(Hex, Player)>);

impl Snapshot {
    pub fn pieces(&self) -> &[(Hex, Player)] {
        &self.0
    }

    pub fn count(&self, player: Player) -> usize {
        self.0.iter().filter(|&&(_, owner)| owner == player).count()
    }

    pub fn to_board(&self) -> Board {
        Board::from_pieces(self.0.iter().copied())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board(pieces: &[((i8, i8), Player)]) -> Board {
        Board::from_pieces(pieces.iter().map(|&(hex, p)| (Hex::from(hex), p)))
    }

    fn crowded_board() -> Board {
        board(&[
            ((-1, 0), Player::Red),
            ((0, 0), Player::Green),
            ((1, -1), Player::Green),
            ((0, 1), Player::Blue),
            ((3, -3), Player::Red),
            ((2, -2), Player::Red),
            ((-2, 3), Player::Green),
            ((-1, -2), Player::Blue),
        ])
    }

    #[test]
    fn test_starting_board() {
        let game = Board::starting();
        assert_eq!(game.total_pieces(), 12);
        for player in Player::ALL {
            assert_eq!(game.count(player), 4);
            assert_eq!(game.pieces_of(player), player.config().starts.to_vec());
        }
    }

    #[test]
    fn test_player_cycle_and_parse() {
        assert_eq!(Player::Red.next(), Player::Green);
        assert_eq!(Player::Green.next(), Player::Blue);
        assert_eq!(Player::Blue.next(), Player::Red);
        assert_eq!("Green".parse::<Player>().unwrap(), Player::Green);
        assert!(matches!(
            "purple".parse::<Player>(),
            Err(ChexersError::UnknownColour(_))
        ));
    }

    #[test]
    fn test_exits_on_board_edge() {
        for player in Player::ALL {
            let config = player.config();
            for exit in config.exits {
                assert!(exit.is_on_board());
                assert_eq!(exit.q.abs().max(exit.r.abs()).max(exit.s().abs()), 3);
            }
            for corner in config.corners {
                assert!(config.exits.contains(&corner));
            }
        }
        assert!(!EXIT_STAGING.is_on_board());
    }

    #[test]
    fn test_opening_move_prefers_step() {
        let game = Board::starting();
        let destinations = game.legal_destinations(Hex::new(-3, 0));
        assert_eq!(destinations[0], Some(Hex::new(-2, 0)));
        // South-east neighbour (-3, 1) is red; (-3, 2) behind it is red too
        assert_eq!(destinations[1], None);
        // Off-board directions
        assert_eq!(destinations[2], None);
        assert_eq!(destinations[3], None);
    }

    #[test]
    fn test_jump_recolours_and_moves() {
        let game = board(&[((-1, 0), Player::Red), ((0, 0), Player::Green)]);
        let destinations = game.legal_destinations(Hex::new(-1, 0));
        assert_eq!(destinations[0], Some(Hex::new(1, 0)));

        let after = game.apply(Action::Jump {
            from: Hex::new(-1, 0),
            to: Hex::new(1, 0),
        });
        assert_eq!(after.get(Hex::new(0, 0)), Some(Player::Red));
        assert_eq!(after.get(Hex::new(1, 0)), Some(Player::Red));
        assert_eq!(after.get(Hex::new(-1, 0)), None);
        assert_eq!(after.count(Player::Green), 0);
        // Source board is untouched
        assert_eq!(game.get(Hex::new(0, 0)), Some(Player::Green));
    }

    #[test]
    fn test_blocked_jump_gives_nothing() {
        let game = board(&[
            ((-1, 0), Player::Red),
            ((0, 0), Player::Green),
            ((1, 0), Player::Blue),
        ]);
        assert_eq!(game.legal_destinations(Hex::new(-1, 0))[0], None);
    }

    #[test]
    fn test_exit_successor() {
        let game = board(&[((3, -1), Player::Red), ((0, 0), Player::Green)]);
        let actions = game.legal_actions(Player::Red);
        assert_eq!(actions[0], Action::Exit { from: Hex::new(3, -1) });

        let successors = game.successors(Player::Red);
        assert_eq!(successors.len(), actions.len());
        assert_eq!(successors[0].count(Player::Red), 0);
    }

    #[test]
    fn test_forced_pass() {
        let game = board(&[((0, 0), Player::Green)]);
        assert!(game.legal_actions(Player::Red).is_empty());
        let successors = game.successors(Player::Red);
        assert_eq!(successors, vec![game.clone()]);
        assert_eq!(game.action_to(&successors[0]), Some(Action::Pass));
    }

    #[test]
    fn test_staging_cell_removes_piece() {
        let mut game = board(&[((3, 0), Player::Red)]);
        game.play(Action::Move {
            from: Hex::new(3, 0),
            to: EXIT_STAGING,
        });
        assert_eq!(game.total_pieces(), 0);
    }

    #[test]
    fn test_diff_round_trip() {
        for game in [Board::starting(), crowded_board()] {
            for player in Player::ALL {
                for successor in game.successors(player) {
                    let action = game.action_to(&successor).expect("classifiable");
                    assert_eq!(game.apply(action), successor, "{:?} {}", player, action);
                }
            }
        }
    }

    #[test]
    fn test_diff_reports_exit_without_destination() {
        let game = crowded_board();
        let after = game.apply(Action::Exit { from: Hex::new(3, -3) });
        assert_eq!(game.diff(&after), (Some(Hex::new(3, -3)), None));
    }

    #[test]
    fn test_play_unplay_restores() {
        let game = crowded_board();
        for player in Player::ALL {
            for action in game.legal_actions(player) {
                let mut scratch = game.clone();
                let undo = scratch.play(action);
                assert_ne!(scratch, game);
                scratch.unplay(undo);
                assert_eq!(scratch, game, "{}", action);
            }
        }
    }

    #[test]
    fn test_snapshot_order_independent() {
        let a = board(&[((0, 0), Player::Red), ((1, 0), Player::Blue)]);
        let b = board(&[((1, 0), Player::Blue), ((0, 0), Player::Red)]);
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.snapshot().to_board(), a);
        assert_eq!(a.snapshot().count(Player::Blue), 1);
    }

    #[test]
    fn test_exit_counts() {
        let mut exits = ExitCounts::default();
        assert_eq!(exits.winner(), None);
        for _ in 0..WINNING_EXITS {
            exits.increment(Player::Blue);
        }
        assert_eq!(exits.get(Player::Blue), 4);
        assert_eq!(exits.winner(), Some(Player::Blue));
        assert_eq!(ExitCounts::default().with_exit(Player::Red).get(Player::Red), 1);
    }

    #[test]
    fn test_wire_format() {
        let jump = Action::Jump {
            from: Hex::new(-1, 0),
            to: Hex::new(1, 0),
        };
        assert_eq!(serde_json::to_string(&jump).unwrap(), r#"["JUMP",[[-1,0],[1,0]]]"#);
        assert_eq!(
            serde_json::to_string(&Action::Exit { from: Hex::new(3, -3) }).unwrap(),
            r#"["EXIT",[3,-3]]"#
        );
        assert_eq!(serde_json::to_string(&Action::Pass).unwrap(), r#"["PASS",null]"#);

        let parsed: Action = serde_json::from_str(r#"["MOVE",[[-3,0],[-2,0]]]"#).unwrap();
        assert_eq!(
            parsed,
            Action::Move {
                from: Hex::new(-3, 0),
                to: Hex::new(-2, 0)
            }
        );
        let parsed: Action = serde_json::from_str(r#"["EXIT",[0,-3]]"#).unwrap();
        assert_eq!(parsed, Action::Exit { from: Hex::new(0, -3) });

        assert!(serde_json::from_str::<Action>(r#"["EXIT",null]"#).is_err());
        assert!(serde_json::from_str::<Action>(r#"["FLY",null]"#).is_err());
    }

    #[test]
    fn test_classify() {
        let a = Hex::new(0, 0);
        assert_eq!(Action::classify(None, None), Some(Action::Pass));
        assert_eq!(Action::classify(Some(a), None), Some(Action::Exit { from: a }));
        assert!(matches!(
            Action::classify(Some(a), Some(Hex::new(0, 2))),
            Some(Action::Jump { .. })
        ));
        assert_eq!(Action::classify(Some(a), Some(Hex::new(3, 0))), None);
    }
}
