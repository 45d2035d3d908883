use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A board coordinate: `row` grows downwards, `col` grows to the right.
///
/// Ordered row-major so sets of cells iterate in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { row: 0, col: 0 };

    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether `other` is one of the 8 cells touching this one.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self != other && (self.row - other.row).abs() <= 1 && (self.col - other.col).abs() <= 1
    }
}

impl Add for Cell {
    type Output = Cell;

    #[inline]
    fn add(self, rhs: Cell) -> Self::Output {
        Cell::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl From<(i32, i32)> for Cell {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The 8 neighbour offsets around a cell.
pub const NEIGHBOR_STEPS: [Cell; 8] = [
    Cell { row: -1, col: -1 },
    Cell { row: -1, col: 0 },
    Cell { row: -1, col: 1 },
    Cell { row: 0, col: -1 },
    Cell { row: 0, col: 1 },
    Cell { row: 1, col: -1 },
    Cell { row: 1, col: 0 },
    Cell { row: 1, col: 1 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_excludes_self_and_distant_cells() {
        let c = Cell::new(1, 1);
        assert!(!c.is_adjacent(c));
        assert!(c.is_adjacent(Cell::new(0, 0)));
        assert!(c.is_adjacent(Cell::new(2, 1)));
        assert!(!c.is_adjacent(Cell::new(3, 1)));
    }

    #[test]
    fn steps_cover_every_neighbour_once() {
        let c = Cell::new(5, 5);
        let mut around: Vec<Cell> = NEIGHBOR_STEPS.iter().map(|&d| c + d).collect();
        around.sort();
        around.dedup();
        assert_eq!(around.len(), 8);
        assert!(around.iter().all(|&n| c.is_adjacent(n)));
    }

    #[test]
    fn cells_order_row_major() {
        assert!(Cell::new(0, 5) < Cell::new(1, 0));
        assert!(Cell::new(1, 0) < Cell::new(1, 1));
    }
}
