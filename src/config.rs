use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::board::Board;
use crate::core::cell::Cell;
use crate::game::field::MineField;
use crate::knowledge::{InferenceError, InferenceLimits};

/// One game, as read from JSON.
///
/// ```json
/// { "height": 3, "width": 3, "mines": [{"row": 0, "col": 0}], "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub height: i32,
    pub width: i32,
    pub mines: Vec<Cell>,
    /// Seed for guesses; absent means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Overrides [`InferenceLimits::for_board`].
    #[serde(default)]
    pub limits: Option<InferenceLimits>,
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, InferenceError> {
        serde_json::from_str(text).map_err(|e| InferenceError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let text = std::fs::read_to_string(path).map_err(|e| InferenceError::InvalidConfig {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_json(&text)
    }

    #[inline]
    pub fn board(&self) -> Board {
        Board::new(self.height, self.width)
    }

    pub fn limits(&self) -> InferenceLimits {
        self.limits
            .unwrap_or_else(|| InferenceLimits::for_board(&self.board()))
    }

    /// Validates dimensions and mines and builds the field.
    pub fn mine_field(&self) -> Result<MineField, InferenceError> {
        if self.height <= 0 || self.width <= 0 {
            return Err(InferenceError::InvalidConfig {
                reason: format!("board must be non-empty, got {}x{}", self.height, self.width),
            });
        }
        let mut seen: FxHashSet<Cell> = FxHashSet::default();
        for &cell in &self.mines {
            if !seen.insert(cell) {
                return Err(InferenceError::InvalidConfig {
                    reason: format!("mine {cell} listed twice"),
                });
            }
        }
        MineField::new(self.board(), self.mines.iter().copied())
    }
}
