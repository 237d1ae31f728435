//! Tabular persistence for the four data contracts.
//!
//! Positions, market snapshots, daily hedges, and PnL are exchanged as CSV tables with
//! the column names below. Readers check the header first, so a missing column is
//! reported once against the header rather than on every row.
//!
//! | table         | columns                                                    |
//! |---------------|------------------------------------------------------------|
//! | positions     | Underlying, Strike, Expiry, Type, SideFactor, Contracts    |
//! | market        | Date, Underlying, Price, Rate, ImpliedVol, [DividendYield] |
//! | daily_hedges  | Date, Underlying, LegDelta, HedgeShares                    |
//! | pnl           | Date, Underlying, HedgePnL, CumulativePnL                  |
//!
//! The `load_*`/`save_*` path helpers choose JSON when the file extension is `.json`
//! and CSV otherwise. JSON files are arrays of objects keyed by the same column names,
//! and rows from either format pass through the same `from_row` validation.

pub mod rows;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::{HedgeError, from_json, write_json_file};
use crate::hedging::DailyHedgeRecord;
use crate::instruments::Position;
use crate::market::MarketSnapshot;
use crate::risk::PnLRecord;

pub use rows::{HedgeRow, MarketRow, PnlRow, PositionRow};
use rows::{HEDGES_TABLE, MARKET_TABLE, PNL_TABLE, POSITIONS_TABLE};

/// Reads and validates a positions table.
pub fn read_positions<R: Read>(reader: R) -> Result<Vec<Position>, HedgeError> {
    let rows = read_rows(reader, POSITIONS_TABLE, &PositionRow::COLUMNS)?;
    convert_rows(rows, Position::from_row)
}

/// Reads and validates a market snapshot table.
pub fn read_market<R: Read>(reader: R) -> Result<Vec<MarketSnapshot>, HedgeError> {
    let rows = read_rows(reader, MARKET_TABLE, &MarketRow::COLUMNS)?;
    convert_rows(rows, MarketSnapshot::from_row)
}

/// Reads and validates a persisted daily hedge table.
pub fn read_hedges<R: Read>(reader: R) -> Result<Vec<DailyHedgeRecord>, HedgeError> {
    let rows = read_rows(reader, HEDGES_TABLE, &HedgeRow::COLUMNS)?;
    convert_rows(rows, DailyHedgeRecord::from_row)
}

/// Writes the daily hedge table.
pub fn write_hedges<W: Write>(writer: W, records: &[DailyHedgeRecord]) -> Result<(), HedgeError> {
    write_rows(
        writer,
        HEDGES_TABLE,
        &HedgeRow::COLUMNS,
        records.iter().map(HedgeRow::from),
    )
}

/// Writes the PnL table.
pub fn write_pnl<W: Write>(writer: W, records: &[PnLRecord]) -> Result<(), HedgeError> {
    write_rows(writer, PNL_TABLE, &PnlRow::COLUMNS, records.iter().map(PnlRow::from))
}

/// Loads a positions file.
///
/// A `.json` file holds an array of objects keyed by the table's column names and
/// goes through the same row validation as CSV.
pub fn load_positions(path: impl AsRef<Path>) -> Result<Vec<Position>, HedgeError> {
    let path = path.as_ref();
    if is_json(path) {
        let rows = read_json_rows(path, POSITIONS_TABLE)?;
        return convert_rows(rows, Position::from_row);
    }
    read_positions(File::open(path)?)
}

/// Loads a market snapshot file (CSV, or JSON keyed by column name).
pub fn load_market(path: impl AsRef<Path>) -> Result<Vec<MarketSnapshot>, HedgeError> {
    let path = path.as_ref();
    if is_json(path) {
        let rows = read_json_rows(path, MARKET_TABLE)?;
        return convert_rows(rows, MarketSnapshot::from_row);
    }
    read_market(File::open(path)?)
}

/// Loads a daily hedge file written by [`save_hedges`] or by hand.
pub fn load_hedges(path: impl AsRef<Path>) -> Result<Vec<DailyHedgeRecord>, HedgeError> {
    let path = path.as_ref();
    if is_json(path) {
        let rows = read_json_rows(path, HEDGES_TABLE)?;
        return convert_rows(rows, DailyHedgeRecord::from_row);
    }
    read_hedges(File::open(path)?)
}

/// Saves the daily hedge table. JSON output uses the CSV column names as keys.
pub fn save_hedges(path: impl AsRef<Path>, records: &[DailyHedgeRecord]) -> Result<(), HedgeError> {
    let path = path.as_ref();
    if is_json(path) {
        let rows: Vec<HedgeRow> = records.iter().map(HedgeRow::from).collect();
        return write_json_file(path, &rows);
    }
    write_hedges(File::create(path)?, records)
}

/// Saves the PnL table. JSON output uses the CSV column names as keys.
pub fn save_pnl(path: impl AsRef<Path>, records: &[PnLRecord]) -> Result<(), HedgeError> {
    let path = path.as_ref();
    if is_json(path) {
        let rows: Vec<PnlRow> = records.iter().map(PnlRow::from).collect();
        return write_json_file(path, &rows);
    }
    write_pnl(File::create(path)?, records)
}

/// Runs each raw row through its domain conversion with a 1-based row number.
fn convert_rows<Row, T>(
    rows: Vec<Row>,
    convert: impl Fn(Row, usize) -> Result<T, HedgeError>,
) -> Result<Vec<T>, HedgeError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| convert(row, idx + 1))
        .collect()
}

fn read_json_rows<T: DeserializeOwned>(
    path: &Path,
    table: &'static str,
) -> Result<Vec<T>, HedgeError> {
    let payload = fs::read_to_string(path)?;
    from_json(&payload).map_err(|err| HedgeError::Parse {
        table,
        message: err.to_string(),
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_rows<R: Read, T: DeserializeOwned>(
    reader: R,
    table: &'static str,
    required_columns: &[&'static str],
) -> Result<Vec<T>, HedgeError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|err| parse_error(table, err))?;
    if let Some(field) = required_columns
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(HedgeError::SchemaError {
            table,
            row: 0,
            field: *field,
        });
    }

    reader
        .deserialize()
        .map(|row| row.map_err(|err| parse_error(table, err)))
        .collect()
}

/// The header is written explicitly so an empty table still carries its columns.
fn write_rows<W: Write, T: Serialize>(
    writer: W,
    table: &'static str,
    columns: &[&'static str],
    rows: impl Iterator<Item = T>,
) -> Result<(), HedgeError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer
        .write_record(columns)
        .map_err(|err| parse_error(table, err))?;
    for row in rows {
        writer.serialize(row).map_err(|err| parse_error(table, err))?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_error(table: &'static str, err: csv::Error) -> HedgeError {
    if err.is_io_error() {
        return HedgeError::Io(err.to_string());
    }
    HedgeError::Parse {
        table,
        message: err.to_string(),
    }
}
