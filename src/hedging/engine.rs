//! Module `hedging::engine`.
//!
//! Turns a position book plus a series of end-of-day market snapshots into one net
//! delta and hedge size per `(date, underlying)`.
//!
//! For each snapshot date the book is joined against that date's snapshots by
//! underlying. Legs without a same-date snapshot are dropped for that date (no zero
//! record is emitted). Each matched leg is priced once, scaled by
//! `side × contracts × multiplier`, and summed per underlying; the hedge is the
//! negated sum.
//!
//! Dates are independent. With the `parallel` feature they are processed on the Rayon
//! pool; output order is ascending date then underlying either way.

use std::collections::BTreeMap;

use chrono::NaiveDate;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, HedgeConfig};
use crate::core::HedgeError;
use crate::instruments::Position;
use crate::market::{MarketSnapshot, index_by_date};
use crate::pricing::bs_delta;
use crate::rates::year_fraction;
use crate::tables::rows::{HEDGES_TABLE, HedgeRow, required};

/// One position leg priced against one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LegComputation<'a> {
    pub position: &'a Position,
    pub snapshot: &'a MarketSnapshot,
    /// `expiry - date` in years under the configured day count.
    pub time_to_expiry: f64,
    /// Per-unit delta from the pricer.
    pub unit_delta: f64,
    /// Share-equivalent delta of the leg.
    pub leg_delta: f64,
}

impl<'a> LegComputation<'a> {
    /// Prices `position` against `snapshot`. The caller is responsible for the join.
    pub fn compute(
        position: &'a Position,
        snapshot: &'a MarketSnapshot,
        config: &HedgeConfig,
    ) -> Result<Self, HedgeError> {
        debug_assert_eq!(position.underlying, snapshot.underlying);
        let time_to_expiry = year_fraction(snapshot.date, position.expiry, config.day_count);
        let unit_delta = bs_delta(
            position.option_type,
            snapshot.price,
            position.strike,
            snapshot.rate,
            snapshot.dividend_yield,
            snapshot.implied_vol,
            time_to_expiry,
        )?;
        Ok(Self {
            position,
            snapshot,
            time_to_expiry,
            unit_delta,
            leg_delta: unit_delta * position.units(config.contract_multiplier),
        })
    }
}

/// Net option delta and offsetting stock position for one underlying on one date.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyHedgeRecord {
    pub date: NaiveDate,
    pub underlying: String,
    /// Net option delta in share-equivalent units.
    pub leg_delta: f64,
    /// Stock position that flattens `leg_delta`.
    pub hedge_shares: f64,
}

impl DailyHedgeRecord {
    /// Builds a record with `hedge_shares = -leg_delta`.
    pub fn new(date: NaiveDate, underlying: impl Into<String>, leg_delta: f64) -> Self {
        Self {
            date,
            underlying: underlying.into(),
            leg_delta,
            hedge_shares: -leg_delta,
        }
    }

    /// Converts a persisted hedge row. Both delta columns are taken as stored.
    pub fn from_row(raw: HedgeRow, row: usize) -> Result<Self, HedgeError> {
        let table = HEDGES_TABLE;
        let date = required(raw.date, table, row, "Date")?;
        let underlying = required(raw.underlying, table, row, "Underlying")?;
        let leg_delta = required(raw.leg_delta, table, row, "LegDelta")?;
        let hedge_shares = required(raw.hedge_shares, table, row, "HedgeShares")?;
        if !leg_delta.is_finite() || !hedge_shares.is_finite() {
            return Err(HedgeError::InvalidInput(format!(
                "{table} row {row} ({underlying} on {date}): deltas must be finite"
            )));
        }
        Ok(Self {
            date,
            underlying,
            leg_delta,
            hedge_shares,
        })
    }
}

/// Computes daily net deltas and hedge sizes for the book.
///
/// Errors:
/// - duplicate `(date, underlying)` snapshots or an invalid config: `InvalidInput`;
/// - a leg the pricer rejects: `InvalidInput` naming the leg, date, and underlying,
///   unless `config.failure_policy` is [`FailurePolicy::SkipLeg`].
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use deltahedge::config::HedgeConfig;
/// use deltahedge::core::OptionType;
/// use deltahedge::hedging::compute_hedges;
/// use deltahedge::instruments::Position;
/// use deltahedge::market::MarketSnapshot;
///
/// let today = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
/// let expiry = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let book = vec![Position::new("XYZ", 100.0, expiry, OptionType::Call, 1.0, 1).unwrap()];
/// let market = vec![
///     MarketSnapshot::builder(today, "XYZ")
///         .price(100.0)
///         .rate(0.05)
///         .implied_vol(0.2)
///         .build()
///         .unwrap(),
/// ];
///
/// let hedges = compute_hedges(&book, &market, &HedgeConfig::default()).unwrap();
/// assert_eq!(hedges.len(), 1);
/// assert!((hedges[0].leg_delta - 63.68).abs() < 1e-2);
/// assert_eq!(hedges[0].hedge_shares, -hedges[0].leg_delta);
/// ```
pub fn compute_hedges(
    positions: &[Position],
    snapshots: &[MarketSnapshot],
    config: &HedgeConfig,
) -> Result<Vec<DailyHedgeRecord>, HedgeError> {
    config.validate()?;
    let index = index_by_date(snapshots)?;
    let days: Vec<_> = index.iter().collect();

    // Results are gathered in date order before short-circuiting, so the reported
    // error is always the earliest failing date.
    #[cfg(feature = "parallel")]
    let per_day = days
        .par_iter()
        .map(|&(date, market)| hedge_day(*date, market, positions, config))
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    #[cfg(not(feature = "parallel"))]
    let per_day = days
        .iter()
        .map(|&(date, market)| hedge_day(*date, market, positions, config))
        .collect::<Result<Vec<_>, _>>()?;

    let records: Vec<DailyHedgeRecord> = per_day.into_iter().flatten().collect();
    info!(
        positions = positions.len(),
        snapshots = snapshots.len(),
        dates = days.len(),
        records = records.len(),
        "computed daily hedges"
    );
    Ok(records)
}

fn hedge_day(
    date: NaiveDate,
    market: &BTreeMap<&str, &MarketSnapshot>,
    positions: &[Position],
    config: &HedgeConfig,
) -> Result<Vec<DailyHedgeRecord>, HedgeError> {
    let mut net: BTreeMap<&str, f64> = BTreeMap::new();
    let mut unmatched = 0_usize;

    for (idx, position) in positions.iter().enumerate() {
        let Some(snapshot) = market.get(position.underlying.as_str()) else {
            unmatched += 1;
            continue;
        };
        match LegComputation::compute(position, snapshot, config) {
            Ok(leg) => *net.entry(position.underlying.as_str()).or_insert(0.0) += leg.leg_delta,
            Err(err) => {
                let err = err.with_context(format!(
                    "leg {} ({} {} K={} expiring {}) on {date}",
                    idx + 1,
                    position.underlying,
                    position.option_type,
                    position.strike,
                    position.expiry
                ));
                match config.failure_policy {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::SkipLeg => warn!(
                        %date,
                        underlying = %position.underlying,
                        leg = idx + 1,
                        error = %err,
                        "skipping leg rejected by pricer"
                    ),
                }
            }
        }
    }

    debug!(%date, underlyings = net.len(), unmatched, "aggregated net deltas");
    Ok(net
        .into_iter()
        .map(|(underlying, leg_delta)| DailyHedgeRecord::new(date, underlying, leg_delta))
        .collect())
}
