//! Hedge PnL attribution for the daily delta-hedge series.
//!
//! Module deltahedge::risk::pnl consumes [`DailyHedgeRecord`]s only, so it can run on a
//! hedge table persisted by an earlier run.
//!
//! Per underlying, in date order, `hedge_pnl = hedge_shares × (leg_delta − prev_leg_delta)`
//! with `prev_leg_delta = 0` on the first date, and `cumulative_pnl` is the running sum.
//! The delta change stands in for the underlying price move; this approximation is kept
//! as-is because changing it changes reported PnL.

use std::collections::BTreeMap;

use chrono::NaiveDate;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::HedgeError;
use crate::hedging::DailyHedgeRecord;

/// Daily and running hedge PnL for one underlying.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PnLRecord {
    pub date: NaiveDate,
    pub underlying: String,
    pub hedge_pnl: f64,
    /// Running sum of `hedge_pnl` for the underlying up to and including `date`.
    pub cumulative_pnl: f64,
}

/// Per-underlying roll-up of a PnL series.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UnderlyingSummary {
    pub underlying: String,
    pub days: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub final_cumulative_pnl: f64,
    pub worst_daily_pnl: f64,
}

/// Computes day-over-day hedge PnL and cumulative PnL per underlying.
///
/// Input order does not matter. Output is ordered by date, then underlying.
/// A repeated date within one underlying's series is rejected with `InvalidInput`.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use deltahedge::hedging::DailyHedgeRecord;
/// use deltahedge::risk::compute_hedge_pnl;
///
/// let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let d2 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let hedges = vec![
///     DailyHedgeRecord::new(d1, "XYZ", 50.0),
///     DailyHedgeRecord::new(d2, "XYZ", 70.0),
/// ];
///
/// let pnl = compute_hedge_pnl(&hedges).unwrap();
/// assert_eq!(pnl[0].hedge_pnl, -2500.0);
/// assert_eq!(pnl[1].hedge_pnl, -1400.0);
/// assert_eq!(pnl[1].cumulative_pnl, -3900.0);
/// ```
pub fn compute_hedge_pnl(records: &[DailyHedgeRecord]) -> Result<Vec<PnLRecord>, HedgeError> {
    let mut by_underlying: BTreeMap<&str, Vec<&DailyHedgeRecord>> = BTreeMap::new();
    for record in records {
        by_underlying
            .entry(record.underlying.as_str())
            .or_default()
            .push(record);
    }
    let underlyings = by_underlying.len();

    #[cfg(feature = "parallel")]
    let per_underlying = by_underlying
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(underlying, series)| pnl_series(underlying, series))
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    #[cfg(not(feature = "parallel"))]
    let per_underlying = by_underlying
        .into_iter()
        .map(|(underlying, series)| pnl_series(underlying, series))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out: Vec<PnLRecord> = per_underlying.into_iter().flatten().collect();
    out.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.underlying.cmp(&b.underlying))
    });
    info!(underlyings, records = out.len(), "computed hedge pnl");
    Ok(out)
}

fn pnl_series(
    underlying: &str,
    mut series: Vec<&DailyHedgeRecord>,
) -> Result<Vec<PnLRecord>, HedgeError> {
    series.sort_by_key(|record| record.date);
    if let Some(pair) = series.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(HedgeError::InvalidInput(format!(
            "duplicate hedge record for {underlying} on {}",
            pair[0].date
        )));
    }

    let mut prev_leg_delta = 0.0;
    let mut cumulative_pnl = 0.0;
    let out: Vec<PnLRecord> = series
        .into_iter()
        .map(|record| {
            let hedge_pnl = record.hedge_shares * (record.leg_delta - prev_leg_delta);
            prev_leg_delta = record.leg_delta;
            cumulative_pnl += hedge_pnl;
            PnLRecord {
                date: record.date,
                underlying: record.underlying.clone(),
                hedge_pnl,
                cumulative_pnl,
            }
        })
        .collect();
    debug!(underlying, days = out.len(), cumulative_pnl, "scanned hedge series");
    Ok(out)
}

/// Rolls a PnL series up per underlying, ordered by underlying.
pub fn summarize(records: &[PnLRecord]) -> Vec<UnderlyingSummary> {
    let mut summaries: BTreeMap<&str, UnderlyingSummary> = BTreeMap::new();
    for record in records {
        summaries
            .entry(record.underlying.as_str())
            .and_modify(|s| {
                s.days += 1;
                s.worst_daily_pnl = s.worst_daily_pnl.min(record.hedge_pnl);
                if record.date < s.first_date {
                    s.first_date = record.date;
                }
                if record.date >= s.last_date {
                    s.last_date = record.date;
                    s.final_cumulative_pnl = record.cumulative_pnl;
                }
            })
            .or_insert_with(|| UnderlyingSummary {
                underlying: record.underlying.clone(),
                days: 1,
                first_date: record.date,
                last_date: record.date,
                final_cumulative_pnl: record.cumulative_pnl,
                worst_daily_pnl: record.hedge_pnl,
            });
    }
    summaries.into_values().collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn two_day_reference_sequence() {
        let hedges = vec![
            DailyHedgeRecord::new(day(2), "XYZ", 50.0),
            DailyHedgeRecord::new(day(3), "XYZ", 70.0),
        ];
        let pnl = compute_hedge_pnl(&hedges).unwrap();
        let daily: Vec<f64> = pnl.iter().map(|r| r.hedge_pnl).collect();
        let cumulative: Vec<f64> = pnl.iter().map(|r| r.cumulative_pnl).collect();
        assert_eq!(daily, vec![-2500.0, -1400.0]);
        assert_eq!(cumulative, vec![-2500.0, -3900.0]);
    }

    #[test]
    fn unsorted_input_is_scanned_in_date_order() {
        let hedges = vec![
            DailyHedgeRecord::new(day(3), "XYZ", 70.0),
            DailyHedgeRecord::new(day(2), "XYZ", 50.0),
        ];
        let pnl = compute_hedge_pnl(&hedges).unwrap();
        assert_eq!(pnl[0].date, day(2));
        assert_eq!(pnl[0].hedge_pnl, -2500.0);
        assert_eq!(pnl[1].hedge_pnl, -1400.0);
    }

    #[test]
    fn underlyings_accumulate_independently() {
        let hedges = vec![
            DailyHedgeRecord::new(day(2), "BBB", 10.0),
            DailyHedgeRecord::new(day(2), "AAA", 50.0),
            DailyHedgeRecord::new(day(4), "BBB", 5.0),
            DailyHedgeRecord::new(day(3), "AAA", 70.0),
        ];
        let pnl = compute_hedge_pnl(&hedges).unwrap();
        let keys: Vec<_> = pnl.iter().map(|r| (r.date, r.underlying.as_str())).collect();
        assert_eq!(
            keys,
            vec![(day(2), "AAA"), (day(2), "BBB"), (day(3), "AAA"), (day(4), "BBB")]
        );

        let bbb: Vec<_> = pnl.iter().filter(|r| r.underlying == "BBB").collect();
        assert_eq!(bbb[0].hedge_pnl, -100.0);
        assert_eq!(bbb[1].hedge_pnl, -5.0 * (5.0 - 10.0));
        assert_eq!(bbb[1].cumulative_pnl, -100.0 + 25.0);
    }

    #[test]
    fn pnl_uses_stored_hedge_shares() {
        let mut record = DailyHedgeRecord::new(day(2), "XYZ", 40.0);
        record.hedge_shares = -30.0;
        let pnl = compute_hedge_pnl(&[record]).unwrap();
        assert_eq!(pnl[0].hedge_pnl, -30.0 * 40.0);
    }

    #[test]
    fn final_cumulative_equals_sum_of_daily() {
        let deltas = [12.5, -3.0, 40.25, 40.25, 0.0, -17.75, 8.0];
        let hedges: Vec<_> = deltas
            .iter()
            .enumerate()
            .map(|(i, &d)| DailyHedgeRecord::new(day(i as u32 + 1), "XYZ", d))
            .collect();
        let pnl = compute_hedge_pnl(&hedges).unwrap();
        let total: f64 = pnl.iter().map(|r| r.hedge_pnl).sum();
        assert_relative_eq!(pnl.last().unwrap().cumulative_pnl, total, epsilon = 1e-9);
    }

    #[test]
    fn duplicate_dates_for_an_underlying_are_rejected() {
        let hedges = vec![
            DailyHedgeRecord::new(day(2), "XYZ", 1.0),
            DailyHedgeRecord::new(day(2), "XYZ", 2.0),
        ];
        let err = compute_hedge_pnl(&hedges).unwrap_err();
        assert!(matches!(err, HedgeError::InvalidInput(ref msg) if msg.contains("XYZ")));
    }

    #[test]
    fn duplicate_error_names_the_first_underlying() {
        let hedges: Vec<_> = ["EEE", "DDD", "CCC", "BBB", "AAA"]
            .into_iter()
            .flat_map(|u| {
                [
                    DailyHedgeRecord::new(day(2), u, 1.0),
                    DailyHedgeRecord::new(day(2), u, 2.0),
                ]
            })
            .collect();

        for _ in 0..8 {
            let err = compute_hedge_pnl(&hedges).unwrap_err();
            assert!(
                matches!(err, HedgeError::InvalidInput(ref msg) if msg.contains("AAA")),
                "{err:?}"
            );
        }
    }

    #[test]
    fn empty_series_yields_empty_output() {
        assert!(compute_hedge_pnl(&[]).unwrap().is_empty());
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn summary_reports_final_and_worst_day() {
        let hedges = vec![
            DailyHedgeRecord::new(day(2), "XYZ", 50.0),
            DailyHedgeRecord::new(day(3), "XYZ", 70.0),
            DailyHedgeRecord::new(day(3), "ABC", 10.0),
        ];
        let pnl = compute_hedge_pnl(&hedges).unwrap();
        let summary = summarize(&pnl);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].underlying, "ABC");
        assert_eq!(summary[1].days, 2);
        assert_eq!(summary[1].first_date, day(2));
        assert_eq!(summary[1].last_date, day(3));
        assert_eq!(summary[1].final_cumulative_pnl, -3900.0);
        assert_eq!(summary[1].worst_daily_pnl, -2500.0);
    }
}
