//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 3;

/// Number of cells on a radius-3 hexagon
pub const CELL_COUNT: usize = 37;

/// Axial hex coordinates. The third cube coordinate is derived as `-q - r`.
///
/// Serialized as a `[q, r]` pair to match the action wire shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i8, i8)", into = "(i8, i8)")]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Derived cube coordinate, so that `q + r + s == 0`
    pub const fn s(&self) -> i8 {
        -self.q - self.r
    }

    /// Check if this hex is on the board
    pub fn is_on_board(&self) -> bool {
        self.q.abs() <= BOARD_RADIUS
            && self.r.abs() <= BOARD_RADIUS
            && self.s().abs() <= BOARD_RADIUS
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i8 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        self.step(direction, 1)
    }

    /// Move `steps` cells along a direction
    pub fn step(&self, direction: usize, steps: i8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq * steps, self.r + dr * steps)
    }

    /// The cell jumped over when travelling from `self` to `to`.
    ///
    /// Only defined for the three hex-aligned distance-2 shapes; anything else
    /// returns `None`.
    pub fn jumped_over(&self, to: Hex) -> Option<Hex> {
        let dq = to.q - self.q;
        let dr = to.r - self.r;
        let aligned = DIRECTIONS.iter().any(|&(q, r)| (2 * q, 2 * r) == (dq, dr));
        if !aligned {
            return None;
        }
        Some(Hex::new(to.q - dq.signum(), to.r - dr.signum()))
    }

    /// All six adjacent cells, on-board or not
    pub fn neighbors(&self) -> impl Iterator<Item = Hex> + '_ {
        (0..6).map(move |dir| self.neighbor(dir))
    }
}

impl From<(i8, i8)> for Hex {
    fn from((q, r): (i8, i8)) -> Self {
        Hex::new(q, r)
    }
}

impl From<Hex> for (i8, i8) {
    fn from(hex: Hex) -> Self {
        (hex.q, hex.r)
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Direction vectors in axial coordinates (dq, dr), in move-generation order.
/// Index: 0=E, 1=SE, 2=SW, 3=W, 4=NW, 5=NE
pub const DIRECTIONS: [(i8, i8); 6] = [
    (1, 0),   // E
    (0, 1),   // SE
    (-1, 1),  // SW
    (-1, 0),  // W
    (0, -1),  // NW
    (1, -1),  // NE
];

/// Every on-board cell, row by row
pub fn all_hexes() -> impl Iterator<Item = Hex> {
    (-BOARD_RADIUS..=BOARD_RADIUS).flat_map(|q| {
        (-BOARD_RADIUS..=BOARD_RADIUS)
            .map(move |r| Hex::new(q, r))
            .filter(Hex::is_on_board)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_on_board() {
        assert!(Hex::new(0, 0).is_on_board());
        assert!(Hex::new(3, 0).is_on_board());
        assert!(Hex::new(-3, 3).is_on_board());
        assert!(!Hex::new(4, 0).is_on_board());
        assert!(!Hex::new(3, 1).is_on_board()); // s = -4
        assert!(!Hex::new(2, 2).is_on_board());
    }

    #[test]
    fn test_board_has_37_cells() {
        let cells: Vec<_> = all_hexes().collect();
        assert_eq!(cells.len(), CELL_COUNT);
        for hex in &cells {
            assert_eq!(hex.q + hex.r + hex.s(), 0);
            assert!(hex.q.abs().max(hex.r.abs()).max(hex.s().abs()) <= BOARD_RADIUS);
        }

        // Exhaustive check over the bounding square
        let accepted = (-6..=6)
            .flat_map(|q| (-6..=6).map(move |r| Hex::new(q, r)))
            .filter(Hex::is_on_board)
            .count();
        assert_eq!(accepted, CELL_COUNT);
    }

    #[test]
    fn test_distance_metric() {
        let cells: Vec<_> = all_hexes().collect();
        for &a in &cells {
            assert_eq!(a.distance_to(a), 0);
            for &b in &cells {
                assert_eq!(a.distance_to(b), b.distance_to(a));
                for &c in cells.iter().step_by(5) {
                    assert!(a.distance_to(c) <= a.distance_to(b) + b.distance_to(c));
                }
            }
        }
        assert_eq!(Hex::new(-3, 0).distance_to(Hex::new(3, 0)), 6);
        assert_eq!(Hex::new(0, 0).distance_to(Hex::new(1, -1)), 1);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = Hex::new(0, 0);
        let ring: Vec<_> = center.neighbors().collect();
        assert_eq!(ring.len(), 6);
        assert!(ring.iter().all(|h| center.distance_to(*h) == 1));
    }

    #[test]
    fn test_jumped_over() {
        let from = Hex::new(-1, 0);
        assert_eq!(from.jumped_over(Hex::new(1, 0)), Some(Hex::new(0, 0)));
        assert_eq!(from.jumped_over(Hex::new(-1, 2)), Some(Hex::new(-1, 1)));
        assert_eq!(from.jumped_over(Hex::new(1, -2)), Some(Hex::new(0, -1)));
        assert_eq!(from.jumped_over(Hex::new(-3, 2)), Some(Hex::new(-2, 1)));
        // Distance 2 but not along a line
        assert_eq!(from.jumped_over(Hex::new(0, 1)), None);
        // (2, 2) offset is distance 4
        assert_eq!(from.jumped_over(Hex::new(1, 2)), None);
    }

    #[test]
    fn test_serde_pair() {
        let json = serde_json::to_string(&Hex::new(-3, 2)).unwrap();
        assert_eq!(json, "[-3,2]");
        let back: Hex = serde_json::from_str("[1,-2]").unwrap();
        assert_eq!(back, Hex::new(1, -2));
    }
}
