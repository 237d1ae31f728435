//! Daily delta aggregation from option legs to per-underlying hedges.

pub mod engine;

pub use engine::{DailyHedgeRecord, LegComputation, compute_hedges};
