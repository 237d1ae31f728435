//! `deltahedge` computes daily delta-hedge positions and hedge PnL for a book of European
//! option positions under Black-Scholes-Merton pricing.
//!
//! The pipeline has three pure stages, each returning a new collection:
//! - `pricing`: closed-form per-unit delta, including the step-function limit at expiry.
//! - `hedging`: joins the book against end-of-day market snapshots, prices every leg, and
//!   nets delta per `(date, underlying)` into a hedge size.
//! - `risk`: turns the hedge series into daily and cumulative PnL per underlying.
//!
//! Supporting modules cover day counts (`rates`), the typed position and snapshot
//! records (`instruments`, `market`), run configuration (`config`), and CSV/JSON table
//! persistence (`tables`).
//!
//! References: Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 19 for
//! delta hedging.
//!
//! # Feature Flags
//! - `parallel`: processes dates (hedging) and underlyings (PnL) on the Rayon pool.
//!   Output ordering is identical to the sequential path.
//!
//! # Quick Start
//! Per-unit delta:
//! ```rust
//! use deltahedge::core::OptionType;
//! use deltahedge::pricing::bs_delta;
//!
//! let delta = bs_delta(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0).unwrap();
//! assert!(delta > 0.63 && delta < 0.64);
//! ```
//!
//! Hedge a one-leg book for two days and attribute PnL:
//! ```rust
//! use chrono::NaiveDate;
//! use deltahedge::config::HedgeConfig;
//! use deltahedge::core::OptionType;
//! use deltahedge::hedging::compute_hedges;
//! use deltahedge::instruments::Position;
//! use deltahedge::market::MarketSnapshot;
//! use deltahedge::risk::compute_hedge_pnl;
//!
//! let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let d2 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
//! let expiry = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
//!
//! let book = vec![Position::new("XYZ", 100.0, expiry, OptionType::Call, -1.0, 5).unwrap()];
//! let market: Vec<MarketSnapshot> = [(d1, 100.0), (d2, 102.5)]
//!     .into_iter()
//!     .map(|(date, px)| {
//!         MarketSnapshot::builder(date, "XYZ")
//!             .price(px)
//!             .rate(0.04)
//!             .implied_vol(0.25)
//!             .build()
//!             .unwrap()
//!     })
//!     .collect();
//!
//! let hedges = compute_hedges(&book, &market, &HedgeConfig::default()).unwrap();
//! assert!(hedges.iter().all(|h| h.hedge_shares == -h.leg_delta));
//!
//! let pnl = compute_hedge_pnl(&hedges).unwrap();
//! let total: f64 = pnl.iter().map(|r| r.hedge_pnl).sum();
//! assert!((pnl[1].cumulative_pnl - total).abs() < 1e-9);
//! ```
//!
//! Day counts:
//! ```rust
//! use chrono::NaiveDate;
//! use deltahedge::rates::{DayCountConvention, year_fraction};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let yf = year_fraction(start, end, DayCountConvention::Act365Fixed);
//! assert!((yf - 1.0).abs() < 1.0e-12);
//! ```

pub mod config;
pub mod core;
pub mod hedging;
pub mod instruments;
pub mod market;
pub mod math;
pub mod pricing;
pub mod rates;
pub mod risk;
pub mod tables;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::config::{FailurePolicy, HedgeConfig};
    pub use crate::core::{HedgeError, OptionType};
    pub use crate::hedging::{DailyHedgeRecord, LegComputation, compute_hedges};
    pub use crate::instruments::Position;
    pub use crate::market::MarketSnapshot;
    pub use crate::pricing::bs_delta;
    pub use crate::rates::{DayCountConvention, year_fraction};
    pub use crate::risk::{PnLRecord, compute_hedge_pnl, summarize};
}
