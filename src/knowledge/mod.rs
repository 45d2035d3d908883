//! Knowledge layer: propositional statements about mines and the inference engine over them.
//!
//! A [`statement::Statement`] says "exactly `count` of these cells are mines". The
//! [`base::KnowledgeBase`] collects statements built from board observations and closes them
//! under two rules until nothing changes:
//! - *propagation*: a statement with `count == 0` proves its cells safe, one with
//!   `count == |cells|` proves them mines; every fact is applied to every statement;
//! - *subset resolution*: `S ⊂ T` yields `T - S` with count `T.count - S.count`.
//!
//! Global facts only grow, statements only shrink, so the loop reaches a fixed point. A
//! [`tracker::StepTracker`] still guards it with explicit [`InferenceLimits`].

pub mod base;
pub mod statement;
pub mod tracker;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::board::Board;
use crate::core::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Guards for the fixpoint loop.
///
/// A consistent knowledge base never gets near these; they exist to turn a runaway loop into
/// an error:
/// - `max_passes`: full propagate + resolve passes in one `propagate_and_resolve` call
/// - `max_statements`: live statements held at any time
pub struct InferenceLimits {
    pub max_passes: u64,
    pub max_statements: usize,
}

impl Default for InferenceLimits {
    fn default() -> Self {
        Self {
            max_passes: 100_000,
            max_statements: 1_000_000,
        }
    }
}

impl InferenceLimits {
    /// Limits scaled to `board`.
    ///
    /// Statements built from observations cover a subset of one cell's neighbourhood and no
    /// two share a cell set, so at most `256` of them exist per cell. A pass that changes
    /// anything adds a fact or a statement, which bounds the passes as well.
    pub fn for_board(board: &Board) -> Self {
        let cells = board.size() as u64;
        Self {
            max_passes: cells * 257 + 16,
            max_statements: (cells * 256 + 64) as usize,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Lifetime counters of a knowledge base.
pub struct InferenceCounts {
    pub observations: u64,
    pub passes: u64,
    pub mines_found: u64,
    pub safes_found: u64,
    pub statements_derived: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors raised by the engine.
///
/// Every variant is fatal: it means the observations fed to the engine contradict each other
/// or the caller broke the call contract. Queries never fail.
pub enum InferenceError {
    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds { cell: Cell, height: i32, width: i32 },

    #[error("cell {cell} was observed but is a known mine")]
    ObservedMine { cell: Cell },

    #[error("cell {cell} observed again with count {count}, previously {previous}")]
    InconsistentObservation {
        cell: Cell,
        previous: usize,
        count: usize,
    },

    #[error("cell {cell} deduced both safe and mine")]
    Conflict { cell: Cell },

    #[error("contradiction: {reason}")]
    Contradiction { reason: String },

    #[error("subset resolution of `{subset}` against `{superset}` gives a negative count")]
    NegativeResolution { subset: String, superset: String },

    #[error("limit exceeded at {stage}: {metric} (limit={limit}, observed={observed})")]
    StepLimitExceeded {
        stage: &'static str,
        metric: &'static str,
        limit: u64,
        observed: u64,
    },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}
