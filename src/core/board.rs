use serde::{Deserialize, Serialize};

use crate::core::cell::{Cell, NEIGHBOR_STEPS};

/// A `height x width` rectangle of cells with the top-left cell at the origin.
///
/// The board only knows geometry; which cells hold mines lives in
/// [`crate::game::field::MineField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub height: i32,
    pub width: i32,
}

impl Board {
    #[inline]
    pub const fn new(height: i32, width: i32) -> Self {
        Self { height, width }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.height).contains(&cell.row) && (0..self.width).contains(&cell.col)
    }

    /// Total number of cells (zero for degenerate dimensions).
    pub fn size(&self) -> usize {
        if self.height <= 0 || self.width <= 0 {
            return 0;
        }
        (self.height as usize) * (self.width as usize)
    }

    /// In-board cells touching `cell`, in row-major order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOR_STEPS
            .iter()
            .map(move |&step| cell + step)
            .filter(move |&n| self.contains(n))
    }

    /// Every cell on the board, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (height, width) = (self.height.max(0), self.width.max(0));
        (0..height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }
}
