//! A propositional knowledge base for a Minesweeper-playing agent.
//!
//! The agent feeds each revealed cell and its neighbour count into a
//! [`knowledge::base::KnowledgeBase`], which keeps statements of the form "exactly `n` of
//! these cells are mines" and closes them under propagation and subset resolution. The agent
//! then asks it for a cell that is provably safe, or falls back to a guess.

pub mod config;
pub mod core;
pub mod game;
pub mod knowledge;
