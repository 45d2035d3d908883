//! The knowledge base: global facts plus the live statements, closed under inference.
//!
//! Invariants kept after every public call returns `Ok`:
//! - `known_safe ∩ known_mine == ∅`;
//! - no live statement mentions a cell of `known_safe` or `known_mine`;
//! - no live statement is trivial, and no two share a cell set (equal ones are deduped,
//!   differing counts over the same cells are a contradiction).
//!
//! After an `Err` the contents are unspecified and the base should be dropped.

use std::collections::BTreeSet;

use rand::seq::IteratorRandom;
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::board::Board;
use crate::core::cell::Cell;
use crate::knowledge::statement::Statement;
use crate::knowledge::tracker::StepTracker;
use crate::knowledge::{InferenceCounts, InferenceError, InferenceLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fact {
    Mine,
    Safe,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// What a single fixpoint run did.
pub struct FixpointStats {
    pub passes: u64,
    pub mines_found: u64,
    pub safes_found: u64,
    pub statements_derived: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A sorted, serializable copy of the knowledge base contents.
pub struct KnowledgeSnapshot {
    pub board: Board,
    pub played: BTreeSet<Cell>,
    pub known_safe: BTreeSet<Cell>,
    pub known_mine: BTreeSet<Cell>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    board: Board,
    limits: InferenceLimits,
    /// Played cell -> the neighbour count it showed.
    played: FxHashMap<Cell, usize>,
    known_safe: FxHashSet<Cell>,
    known_mine: FxHashSet<Cell>,
    statements: BTreeSet<Statement>,
    counts: InferenceCounts,
}

impl KnowledgeBase {
    pub fn new(board: Board) -> Self {
        Self::with_limits(board, InferenceLimits::for_board(&board))
    }

    pub fn with_limits(board: Board, limits: InferenceLimits) -> Self {
        Self {
            board,
            limits,
            played: FxHashMap::default(),
            known_safe: FxHashSet::default(),
            known_mine: FxHashSet::default(),
            statements: BTreeSet::new(),
            counts: InferenceCounts::default(),
        }
    }

    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    #[inline]
    pub fn limits(&self) -> InferenceLimits {
        self.limits
    }

    #[inline]
    pub fn counts(&self) -> InferenceCounts {
        self.counts
    }

    pub fn played(&self) -> impl Iterator<Item = Cell> + '_ {
        self.played.keys().copied()
    }

    #[inline]
    pub fn is_played(&self, cell: Cell) -> bool {
        self.played.contains_key(&cell)
    }

    /// The count shown by a played cell.
    pub fn observed_count(&self, cell: Cell) -> Option<usize> {
        self.played.get(&cell).copied()
    }

    #[inline]
    pub fn known_safes(&self) -> &FxHashSet<Cell> {
        &self.known_safe
    }

    #[inline]
    pub fn known_mines(&self) -> &FxHashSet<Cell> {
        &self.known_mine
    }

    #[inline]
    pub fn statements(&self) -> &BTreeSet<Statement> {
        &self.statements
    }

    /// Every board cell is played or has a known status.
    pub fn is_solved(&self) -> bool {
        self.board.cells().all(|c| {
            self.played.contains_key(&c)
                || self.known_safe.contains(&c)
                || self.known_mine.contains(&c)
        })
    }

    pub fn snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot {
            board: self.board,
            played: self.played.keys().copied().collect(),
            known_safe: self.known_safe.iter().copied().collect(),
            known_mine: self.known_mine.iter().copied().collect(),
            statements: self.statements.iter().cloned().collect(),
        }
    }

    /// Records that `cell` was played safely and showed `count` neighbouring mines, then runs
    /// inference to a fixed point.
    ///
    /// Neighbours already known safe are left out of the new statement; neighbours already
    /// known to be mines are left out and subtracted from `count`. Observing a played cell
    /// again with the same count is a no-op.
    pub fn observe(&mut self, cell: Cell, count: usize) -> Result<FixpointStats, InferenceError> {
        self.check_on_board(cell)?;
        if let Some(&previous) = self.played.get(&cell) {
            if previous == count {
                return Ok(FixpointStats::default());
            }
            return Err(InferenceError::InconsistentObservation {
                cell,
                previous,
                count,
            });
        }
        if self.known_mine.contains(&cell) {
            return Err(InferenceError::ObservedMine { cell });
        }

        debug!(%cell, count, "observe");
        self.played.insert(cell, count);
        self.counts.observations += 1;

        let mut tracker = StepTracker::new(self.limits);
        let mut stats = FixpointStats::default();
        if self.apply_fact(cell, Fact::Safe)? {
            stats.safes_found += 1;
        }

        let neighbors = Statement::new(self.board.neighbors(cell), count)?;
        self.insert_simplified(neighbors, &tracker)?;

        let run = self.run_fixpoint(&mut tracker)?;
        Ok(merge(stats, run))
    }

    /// Adds an externally built statement, simplified against current knowledge, then runs
    /// inference to a fixed point.
    pub fn add_statement(
        &mut self,
        statement: Statement,
    ) -> Result<FixpointStats, InferenceError> {
        for &cell in statement.cells() {
            self.check_on_board(cell)?;
        }
        let mut tracker = StepTracker::new(self.limits);
        self.insert_simplified(statement, &tracker)?;
        self.run_fixpoint(&mut tracker)
    }

    /// Records `cell` as a mine everywhere, then runs inference to a fixed point.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<FixpointStats, InferenceError> {
        self.mark(cell, Fact::Mine)
    }

    /// Records `cell` as safe everywhere, then runs inference to a fixed point.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<FixpointStats, InferenceError> {
        self.mark(cell, Fact::Safe)
    }

    fn mark(&mut self, cell: Cell, fact: Fact) -> Result<FixpointStats, InferenceError> {
        self.check_on_board(cell)?;
        let mut stats = FixpointStats::default();
        if self.apply_fact(cell, fact)? {
            match fact {
                Fact::Mine => stats.mines_found += 1,
                Fact::Safe => stats.safes_found += 1,
            }
        }
        let mut tracker = StepTracker::new(self.limits);
        let run = self.run_fixpoint(&mut tracker)?;
        Ok(merge(stats, run))
    }

    /// Applies propagation and subset resolution until a full pass changes nothing.
    pub fn propagate_and_resolve(&mut self) -> Result<FixpointStats, InferenceError> {
        let mut tracker = StepTracker::new(self.limits);
        self.run_fixpoint(&mut tracker)
    }

    /// A known-safe cell that has not been played yet (the smallest one, so repeated calls
    /// agree). Never mutates.
    pub fn safe_move(&self) -> Option<Cell> {
        self.known_safe
            .iter()
            .filter(|c| !self.played.contains_key(c))
            .min()
            .copied()
    }

    /// A uniformly random cell of the `height x width` rectangle that is neither played nor a
    /// known mine.
    pub fn random_move(&self, height: i32, width: i32) -> Option<Cell> {
        self.random_move_with(&mut rand::thread_rng(), height, width)
    }

    /// [`KnowledgeBase::random_move`] with a caller-supplied RNG.
    pub fn random_move_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        height: i32,
        width: i32,
    ) -> Option<Cell> {
        Board::new(height, width)
            .cells()
            .filter(|c| !self.played.contains_key(c) && !self.known_mine.contains(c))
            .choose(rng)
    }

    fn check_on_board(&self, cell: Cell) -> Result<(), InferenceError> {
        if self.board.contains(cell) {
            return Ok(());
        }
        Err(InferenceError::OutOfBounds {
            cell,
            height: self.board.height,
            width: self.board.width,
        })
    }

    fn run_fixpoint(
        &mut self,
        tracker: &mut StepTracker,
    ) -> Result<FixpointStats, InferenceError> {
        let mut stats = FixpointStats::default();
        loop {
            tracker.bump_passes("fixpoint")?;
            stats.passes += 1;

            let propagated = self.propagate(&mut stats)?;
            let resolved = self.resolve_subsets(tracker, &mut stats)?;
            if !propagated && !resolved {
                break;
            }
        }
        self.counts.passes += stats.passes;
        self.counts.statements_derived += stats.statements_derived;
        debug!(
            passes = stats.passes,
            mines = stats.mines_found,
            safes = stats.safes_found,
            derived = stats.statements_derived,
            live = self.statements.len(),
            "fixpoint reached"
        );
        Ok(stats)
    }

    /// Folds every certain statement into the global sets until none is left.
    ///
    /// Each round removes at least one cell from the statements, so this terminates.
    fn propagate(&mut self, stats: &mut FixpointStats) -> Result<bool, InferenceError> {
        let mut changed = false;
        loop {
            let mut mines: BTreeSet<Cell> = BTreeSet::new();
            let mut safes: BTreeSet<Cell> = BTreeSet::new();
            for s in &self.statements {
                if let Some(cells) = s.deduced_mines() {
                    mines.extend(cells);
                }
                if let Some(cells) = s.deduced_safes() {
                    safes.extend(cells);
                }
            }
            if mines.is_empty() && safes.is_empty() {
                return Ok(changed);
            }
            if let Some(&cell) = mines.intersection(&safes).next() {
                return Err(InferenceError::Conflict { cell });
            }

            for cell in mines {
                if self.apply_fact(cell, Fact::Mine)? {
                    stats.mines_found += 1;
                    changed = true;
                }
            }
            for cell in safes {
                if self.apply_fact(cell, Fact::Safe)? {
                    stats.safes_found += 1;
                    changed = true;
                }
            }
        }
    }

    /// One round of subset resolution over the current statements.
    fn resolve_subsets(
        &mut self,
        tracker: &StepTracker,
        stats: &mut FixpointStats,
    ) -> Result<bool, InferenceError> {
        let mut derived: Vec<Statement> = Vec::new();
        for subset in &self.statements {
            for superset in &self.statements {
                if let Some(d) = subset.resolve_against(superset)? {
                    if !self.statements.contains(&d) {
                        derived.push(d);
                    }
                }
            }
        }

        let mut changed = false;
        for d in derived {
            let text = d.to_string();
            if self.insert_statement(d, tracker)? {
                trace!(statement = %text, "derived");
                stats.statements_derived += 1;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Records a fact and applies it to every statement. Returns `false` if it was already
    /// known.
    fn apply_fact(&mut self, cell: Cell, fact: Fact) -> Result<bool, InferenceError> {
        let (this, other) = match fact {
            Fact::Mine => (&mut self.known_mine, &self.known_safe),
            Fact::Safe => (&mut self.known_safe, &self.known_mine),
        };
        if other.contains(&cell) {
            return Err(InferenceError::Conflict { cell });
        }
        if !this.insert(cell) {
            return Ok(false);
        }
        match fact {
            Fact::Mine => self.counts.mines_found += 1,
            Fact::Safe => self.counts.safes_found += 1,
        }
        trace!(%cell, ?fact, "fact");

        let (touched, untouched): (Vec<Statement>, Vec<Statement>) =
            std::mem::take(&mut self.statements)
                .into_iter()
                .partition(|s| s.contains(cell));
        self.statements = untouched.into_iter().collect();

        let tracker = StepTracker::new(self.limits);
        for mut s in touched {
            match fact {
                Fact::Mine => s.mark_mine(cell)?,
                Fact::Safe => s.mark_safe(cell)?,
            };
            self.insert_statement(s, &tracker)?;
        }
        Ok(true)
    }

    fn insert_simplified(
        &mut self,
        mut statement: Statement,
        tracker: &StepTracker,
    ) -> Result<bool, InferenceError> {
        let cells: Vec<Cell> = statement.cells().iter().copied().collect();
        for cell in cells {
            if self.known_mine.contains(&cell) {
                statement.mark_mine(cell)?;
            } else if self.known_safe.contains(&cell) {
                statement.mark_safe(cell)?;
            }
        }
        self.insert_statement(statement, tracker)
    }

    /// Inserts a simplified statement. Trivial and duplicate statements are dropped; a
    /// statement over the same cells with a different count is a contradiction.
    fn insert_statement(
        &mut self,
        statement: Statement,
        tracker: &StepTracker,
    ) -> Result<bool, InferenceError> {
        if statement.is_trivial() || self.statements.contains(&statement) {
            return Ok(false);
        }
        if let Some(existing) = self
            .statements
            .iter()
            .find(|s| s.cells() == statement.cells())
        {
            return Err(InferenceError::Contradiction {
                reason: format!("`{statement}` disagrees with `{existing}`"),
            });
        }
        self.statements.insert(statement);
        tracker.check_statements("insert_statement", self.statements.len())?;
        Ok(true)
    }
}

fn merge(a: FixpointStats, b: FixpointStats) -> FixpointStats {
    FixpointStats {
        passes: a.passes + b.passes,
        mines_found: a.mines_found + b.mines_found,
        safes_found: a.safes_found + b.safes_found,
        statements_derived: a.statements_derived + b.statements_derived,
    }
}
