//! Raw tabular row shapes.
//!
//! Every column is optional at this layer so that a missing column or empty cell
//! surfaces as a [`HedgeError::SchemaError`] naming the table, row, and field,
//! instead of a generic decode failure. Conversion into the typed domain records
//! (`Position::from_row`, `MarketSnapshot::from_row`, `DailyHedgeRecord::from_row`)
//! is the single validation point.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::HedgeError;
use crate::hedging::DailyHedgeRecord;
use crate::risk::PnLRecord;

pub const POSITIONS_TABLE: &str = "positions";
pub const MARKET_TABLE: &str = "market";
pub const HEDGES_TABLE: &str = "daily_hedges";
pub const PNL_TABLE: &str = "pnl";

/// One line of the positions table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRow {
    #[serde(rename = "Underlying", default)]
    pub underlying: Option<String>,
    #[serde(rename = "Strike", default)]
    pub strike: Option<f64>,
    #[serde(rename = "Expiry", default)]
    pub expiry: Option<NaiveDate>,
    #[serde(rename = "Type", default)]
    pub option_type: Option<String>,
    #[serde(rename = "SideFactor", default)]
    pub side_factor: Option<f64>,
    #[serde(rename = "Contracts", default)]
    pub contracts: Option<u64>,
}

impl PositionRow {
    pub const COLUMNS: [&'static str; 6] =
        ["Underlying", "Strike", "Expiry", "Type", "SideFactor", "Contracts"];
}

/// One line of the market snapshot table. `DividendYield` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    #[serde(rename = "Date", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Underlying", default)]
    pub underlying: Option<String>,
    #[serde(rename = "Price", default)]
    pub price: Option<f64>,
    #[serde(rename = "Rate", default)]
    pub rate: Option<f64>,
    #[serde(rename = "ImpliedVol", default)]
    pub implied_vol: Option<f64>,
    #[serde(rename = "DividendYield", default)]
    pub dividend_yield: Option<f64>,
}

impl MarketRow {
    pub const COLUMNS: [&'static str; 5] = ["Date", "Underlying", "Price", "Rate", "ImpliedVol"];
}

/// One line of the persisted daily hedge table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HedgeRow {
    #[serde(rename = "Date", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Underlying", default)]
    pub underlying: Option<String>,
    #[serde(rename = "LegDelta", default)]
    pub leg_delta: Option<f64>,
    #[serde(rename = "HedgeShares", default)]
    pub hedge_shares: Option<f64>,
}

impl HedgeRow {
    pub const COLUMNS: [&'static str; 4] = ["Date", "Underlying", "LegDelta", "HedgeShares"];
}

impl From<&DailyHedgeRecord> for HedgeRow {
    fn from(record: &DailyHedgeRecord) -> Self {
        Self {
            date: Some(record.date),
            underlying: Some(record.underlying.clone()),
            leg_delta: Some(record.leg_delta),
            hedge_shares: Some(record.hedge_shares),
        }
    }
}

/// One line of the PnL output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Underlying")]
    pub underlying: String,
    #[serde(rename = "HedgePnL")]
    pub hedge_pnl: f64,
    #[serde(rename = "CumulativePnL")]
    pub cumulative_pnl: f64,
}

impl PnlRow {
    pub const COLUMNS: [&'static str; 4] = ["Date", "Underlying", "HedgePnL", "CumulativePnL"];
}

impl From<&PnLRecord> for PnlRow {
    fn from(record: &PnLRecord) -> Self {
        Self {
            date: record.date,
            underlying: record.underlying.clone(),
            hedge_pnl: record.hedge_pnl,
            cumulative_pnl: record.cumulative_pnl,
        }
    }
}

/// Unwraps a required cell or reports which field of which row is missing.
pub(crate) fn required<T>(
    value: Option<T>,
    table: &'static str,
    row: usize,
    field: &'static str,
) -> Result<T, HedgeError> {
    value.ok_or(HedgeError::SchemaError { table, row, field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_reports_table_row_and_field() {
        let err = required::<f64>(None, POSITIONS_TABLE, 4, "Strike").unwrap_err();
        assert_eq!(
            err,
            HedgeError::SchemaError {
                table: "positions",
                row: 4,
                field: "Strike"
            }
        );
        assert_eq!(required(Some(1.5), MARKET_TABLE, 1, "Price").unwrap(), 1.5);
    }

    #[test]
    fn hedge_row_copies_both_delta_columns() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let record = DailyHedgeRecord::new(date, "XYZ", 12.5);
        let row = HedgeRow::from(&record);
        assert_eq!(row.leg_delta, Some(12.5));
        assert_eq!(row.hedge_shares, Some(-12.5));
        assert_eq!(row.underlying.as_deref(), Some("XYZ"));
    }
}
