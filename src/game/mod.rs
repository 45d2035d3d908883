//! A minimal game around the engine: a ground-truth [`field::MineField`] and the
//! [`agent`] loop that plays it.

pub mod agent;
pub mod field;
