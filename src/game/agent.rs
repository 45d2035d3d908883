//! The agent loop around a [`KnowledgeBase`]: pick a move, reveal it, feed the count back.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cell::Cell;
use crate::game::field::MineField;
use crate::knowledge::base::{KnowledgeBase, KnowledgeSnapshot};
use crate::knowledge::{InferenceCounts, InferenceError, InferenceLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// The cell was proven safe before it was played.
    Safe,
    /// No safe cell was known; the cell was a guess.
    Random,
}

/// Chooses the next cell to play from the current knowledge.
///
/// Implementations must only read `kb`; returning `None` ends the game.
pub trait MovePolicy {
    fn next_move<R: Rng + ?Sized>(
        &self,
        kb: &KnowledgeBase,
        rng: &mut R,
    ) -> Option<(Cell, MoveKind)>;
}

/// Any known-safe unplayed cell, else a uniformly random unplayed cell not known to be a
/// mine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeFirst;

impl MovePolicy for SafeFirst {
    fn next_move<R: Rng + ?Sized>(
        &self,
        kb: &KnowledgeBase,
        rng: &mut R,
    ) -> Option<(Cell, MoveKind)> {
        if let Some(cell) = kb.safe_move() {
            return Some((cell, MoveKind::Safe));
        }
        let board = kb.board();
        kb.random_move_with(rng, board.height, board.width)
            .map(|cell| (cell, MoveKind::Random))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Outcome {
    /// Every non-mine cell was played.
    Won,
    /// The agent played a mine.
    Lost { mine: Cell },
    /// The policy had no move left before the board was cleared.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub cell: Cell,
    pub kind: MoveKind,
    /// Neighbouring mines shown by the cell; `None` if it was a mine.
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: Outcome,
    pub moves: Vec<PlayedMove>,
    /// The deduced mines are exactly the true mines.
    pub mines_identified: bool,
    pub counts: InferenceCounts,
    pub knowledge: KnowledgeSnapshot,
}

impl GameReport {
    pub fn guesses(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| m.kind == MoveKind::Random)
            .count()
    }
}

/// Plays one game on `field` with a fresh knowledge base.
///
/// Errors only if the engine detects an inconsistency, which for a real field means a bug.
pub fn play_game<P, R>(
    field: &MineField,
    policy: &P,
    rng: &mut R,
    limits: InferenceLimits,
) -> Result<GameReport, InferenceError>
where
    P: MovePolicy,
    R: Rng + ?Sized,
{
    let mut kb = KnowledgeBase::with_limits(field.board(), limits);
    let mut moves: Vec<PlayedMove> = Vec::new();
    let mut revealed = 0usize;

    let outcome = loop {
        if revealed == field.safe_cell_count() {
            break Outcome::Won;
        }
        let Some((cell, kind)) = policy.next_move(&kb, &mut *rng) else {
            break Outcome::Exhausted;
        };

        if field.is_mine(cell) {
            moves.push(PlayedMove {
                cell,
                kind,
                count: None,
            });
            break Outcome::Lost { mine: cell };
        }

        let count = field.nearby_mines(cell);
        if !kb.is_played(cell) {
            revealed += 1;
        }
        kb.observe(cell, count)?;
        moves.push(PlayedMove {
            cell,
            kind,
            count: Some(count),
        });
    };

    let mines_identified = field.won(kb.known_mines());
    debug!(?outcome, moves = moves.len(), mines_identified, "game over");

    Ok(GameReport {
        outcome,
        moves,
        mines_identified,
        counts: kb.counts(),
        knowledge: kb.snapshot(),
    })
}
