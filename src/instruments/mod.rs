//! Instrument definitions held in the option book.

pub mod position;

pub use position::{DEFAULT_CONTRACT_MULTIPLIER, Position};
