use rustc_hash::FxHashSet;

use crate::core::board::Board;
use crate::core::cell::Cell;
use crate::knowledge::InferenceError;

/// Ground truth for one game: the board and where its mines are.
///
/// Layouts are always supplied by the caller.
#[derive(Debug, Clone)]
pub struct MineField {
    board: Board,
    mines: FxHashSet<Cell>,
}

impl MineField {
    pub fn new(
        board: Board,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, InferenceError> {
        let mut set = FxHashSet::default();
        for cell in mines {
            if !board.contains(cell) {
                return Err(InferenceError::OutOfBounds {
                    cell,
                    height: board.height,
                    width: board.width,
                });
            }
            set.insert(cell);
        }
        Ok(Self { board, mines: set })
    }

    /// Parses a row-per-line picture: `x`/`*` is a mine, anything else is empty.
    ///
    /// ```
    /// use minesweeper_kb::game::field::MineField;
    ///
    /// let field = MineField::from_rows(&["x..", "...", "..x"]).unwrap();
    /// assert_eq!(field.mine_count(), 2);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, InferenceError> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(InferenceError::InvalidConfig {
                reason: "rows of a mine picture must have equal length".to_string(),
            });
        }
        let board = Board::new(rows.len() as i32, width as i32);
        let mines = rows.iter().enumerate().flat_map(|(row, line)| {
            line.chars()
                .enumerate()
                .filter(|(_, ch)| matches!(ch, 'x' | 'X' | '*'))
                .map(move |(col, _)| Cell::new(row as i32, col as i32))
        });
        Self::new(board, mines)
    }

    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    #[inline]
    pub fn mines(&self) -> &FxHashSet<Cell> {
        &self.mines
    }

    #[inline]
    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    #[inline]
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Mines among the in-board cells touching `cell`, not counting `cell` itself.
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        self.board
            .neighbors(cell)
            .filter(|n| self.mines.contains(n))
            .count()
    }

    /// Whether `flagged` is exactly the set of mines.
    pub fn won(&self, flagged: &FxHashSet<Cell>) -> bool {
        *flagged == self.mines
    }

    /// Cells that are not mines.
    pub fn safe_cell_count(&self) -> usize {
        self.board.size() - self.mines.len()
    }
}
