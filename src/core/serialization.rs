//! JSON persistence helpers for hedge and PnL outputs.
//!
//! Every record type in the crate derives serde's `Serialize`/`Deserialize`, so the
//! daily hedge series can be persisted between the hedge and PnL stages either as a
//! table (see [`crate::tables`]) or as a JSON document.
//!
//! # Examples
//! ```rust
//! use chrono::NaiveDate;
//! use deltahedge::core::{from_json, to_json_pretty};
//! use deltahedge::hedging::DailyHedgeRecord;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let records = vec![DailyHedgeRecord::new(date, "XYZ", 63.68)];
//!
//! let json = to_json_pretty(&records).expect("json serialization");
//! let decoded: Vec<DailyHedgeRecord> = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, records);
//! ```

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::core::HedgeError;

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Reads and decodes a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, HedgeError> {
    let payload = fs::read_to_string(path)?;
    Ok(from_json(&payload)?)
}

/// Encodes a value as pretty JSON and writes it to `path`.
pub fn write_json_file<T: serde::Serialize>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), HedgeError> {
    let payload = to_json_pretty(value)?;
    fs::write(path, payload)?;
    Ok(())
}
