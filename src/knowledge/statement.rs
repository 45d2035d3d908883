use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::cell::Cell;
use crate::knowledge::InferenceError;

/// "Exactly `count` of `cells` are mines."
///
/// `0 <= count <= |cells|` holds for every value of this type: the constructor rejects
/// anything else and [`Statement::mark_mine`] / [`Statement::mark_safe`] refuse updates that
/// would break it. An empty statement (`cells == ∅`, `count == 0`) carries no information.
///
/// Equality, hashing and ordering are structural over `(cells, count)`, which is what the
/// knowledge base dedups on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStatement")]
pub struct Statement {
    cells: BTreeSet<Cell>,
    count: usize,
}

#[derive(Deserialize)]
struct RawStatement {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl TryFrom<RawStatement> for Statement {
    type Error = InferenceError;

    fn try_from(raw: RawStatement) -> Result<Self, Self::Error> {
        Statement::new(raw.cells, raw.count)
    }
}

impl Statement {
    pub fn new(
        cells: impl IntoIterator<Item = Cell>,
        count: usize,
    ) -> Result<Self, InferenceError> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(InferenceError::Contradiction {
                reason: format!(
                    "{count} mines claimed among {} cells {}",
                    cells.len(),
                    fmt_cells(&cells)
                ),
            });
        }
        Ok(Self { cells, count })
    }

    #[inline]
    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// `Some(cells)` iff every cell is a mine (`count == |cells| > 0`).
    ///
    /// `None` means "no conclusion", which is different from concluding an empty set.
    pub fn deduced_mines(&self) -> Option<BTreeSet<Cell>> {
        if !self.cells.is_empty() && self.count == self.cells.len() {
            Some(self.cells.clone())
        } else {
            None
        }
    }

    /// `Some(cells)` iff every cell is safe (`count == 0`, `|cells| > 0`).
    pub fn deduced_safes(&self) -> Option<BTreeSet<Cell>> {
        if !self.cells.is_empty() && self.count == 0 {
            Some(self.cells.clone())
        } else {
            None
        }
    }

    /// Removes a cell known to be a mine, decrementing `count`.
    ///
    /// Returns whether the statement changed. Removing a cell from a statement that has no
    /// mines left is a contradiction.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool, InferenceError> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == 0 {
            return Err(InferenceError::Contradiction {
                reason: format!("{cell} is a mine but `{self}` allows none"),
            });
        }
        self.cells.remove(&cell);
        self.count -= 1;
        Ok(true)
    }

    /// Removes a cell known to be safe; `count` is unchanged.
    ///
    /// Returns whether the statement changed. Removing a cell from a statement whose cells
    /// must all be mines is a contradiction.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool, InferenceError> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == self.cells.len() {
            return Err(InferenceError::Contradiction {
                reason: format!("{cell} is safe but `{self}` needs every cell to be a mine"),
            });
        }
        self.cells.remove(&cell);
        Ok(true)
    }

    /// Whether `self.cells` is a non-empty strict subset of `other.cells`.
    pub fn is_strict_subset_of(&self, other: &Statement) -> bool {
        !self.cells.is_empty()
            && self.cells.len() < other.cells.len()
            && self.cells.is_subset(&other.cells)
    }

    /// Subset resolution: for `self ⊂ superset`, the statement over `superset - self`.
    ///
    /// Returns `Ok(None)` when `self` is not a strict subset of `superset`. A negative
    /// difference of counts is reported, never clamped.
    pub fn resolve_against(
        &self,
        superset: &Statement,
    ) -> Result<Option<Statement>, InferenceError> {
        if !self.is_strict_subset_of(superset) {
            return Ok(None);
        }
        let count = superset.count.checked_sub(self.count).ok_or_else(|| {
            InferenceError::NegativeResolution {
                subset: self.to_string(),
                superset: superset.to_string(),
            }
        })?;
        let cells = superset.cells.difference(&self.cells).copied();
        Statement::new(cells, count).map(Some)
    }
}

fn fmt_cells(cells: &BTreeSet<Cell>) -> String {
    let parts: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
    format!("{{{}}}", parts.join(", "))
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", fmt_cells(&self.cells), self.count)
    }
}
