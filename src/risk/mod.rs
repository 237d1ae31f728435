//! Risk analytics over the hedge series.
//!
//! This module wires and re-exports `pnl`: day-over-day hedge PnL attribution,
//! running cumulative PnL, and per-underlying summaries.

pub mod pnl;

pub use pnl::{PnLRecord, UnderlyingSummary, compute_hedge_pnl, summarize};
