//! Small value types shared by the engine and the game driver.
//!
//! - [`cell`]: integer `(row, col)` coordinates and the 8 neighbour offsets.
//! - [`board`]: the rectangular board geometry (bounds, neighbourhoods, iteration).

pub mod board;
pub mod cell;
