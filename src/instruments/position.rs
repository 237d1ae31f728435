//! Option position legs held in the book.
//!
//! A [`Position`] is one European option line item on a named underlying. It is loaded
//! once per run and never mutated; the hedge engine joins it against each day's market
//! snapshot.

use chrono::NaiveDate;

use crate::core::{HedgeError, OptionType};
use crate::tables::rows::{POSITIONS_TABLE, PositionRow, required};

/// Share units represented by one listed option contract.
pub const DEFAULT_CONTRACT_MULTIPLIER: f64 = 100.0;

/// European option leg.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use deltahedge::core::OptionType;
/// use deltahedge::instruments::Position;
///
/// let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
/// let short_puts = Position::new("XYZ", 95.0, expiry, OptionType::Put, -1.0, 10).unwrap();
/// assert_eq!(short_puts.units(100.0), -1_000.0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Underlying instrument identifier.
    pub underlying: String,
    /// Strike level in price units.
    pub strike: f64,
    /// Expiry date.
    pub expiry: NaiveDate,
    /// Call or put.
    pub option_type: OptionType,
    /// Signed scale: positive for long, negative for short.
    pub side_factor: f64,
    /// Number of listed contracts.
    pub contracts: u64,
}

impl Position {
    /// Builds and validates a position leg.
    pub fn new(
        underlying: impl Into<String>,
        strike: f64,
        expiry: NaiveDate,
        option_type: OptionType,
        side_factor: f64,
        contracts: u64,
    ) -> Result<Self, HedgeError> {
        let position = Self {
            underlying: underlying.into(),
            strike,
            expiry,
            option_type,
            side_factor,
            contracts,
        };
        position.validate()?;
        Ok(position)
    }

    /// Validates position fields.
    pub fn validate(&self) -> Result<(), HedgeError> {
        if self.underlying.trim().is_empty() {
            return Err(HedgeError::InvalidInput(
                "position underlying must be non-empty".to_string(),
            ));
        }
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(HedgeError::InvalidInput(format!(
                "position strike must be finite and > 0, got {}",
                self.strike
            )));
        }
        if !self.side_factor.is_finite() {
            return Err(HedgeError::InvalidInput(format!(
                "position side factor must be finite, got {}",
                self.side_factor
            )));
        }
        Ok(())
    }

    /// Converts a raw table row; `row` is the 1-based data row used in error messages.
    pub fn from_row(raw: PositionRow, row: usize) -> Result<Self, HedgeError> {
        let table = POSITIONS_TABLE;
        let underlying = required(raw.underlying, table, row, "Underlying")?;
        let strike = required(raw.strike, table, row, "Strike")?;
        let expiry = required(raw.expiry, table, row, "Expiry")?;
        let option_type = required(raw.option_type, table, row, "Type")?;
        let side_factor = required(raw.side_factor, table, row, "SideFactor")?;
        let contracts = required(raw.contracts, table, row, "Contracts")?;

        let context = format!("{table} row {row} ({underlying})");
        let option_type: OptionType = option_type
            .parse()
            .map_err(|err: HedgeError| err.with_context(&context))?;
        Self::new(underlying, strike, expiry, option_type, side_factor, contracts)
            .map_err(|err| err.with_context(&context))
    }

    /// Signed share-equivalent units per unit of delta: `side × contracts × multiplier`.
    #[inline]
    pub fn units(&self, contract_multiplier: f64) -> f64 {
        self.side_factor * self.contracts as f64 * contract_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PositionRow {
        PositionRow {
            underlying: Some("XYZ".to_string()),
            strike: Some(100.0),
            expiry: NaiveDate::from_ymd_opt(2024, 1, 2),
            option_type: Some("c".to_string()),
            side_factor: Some(1.0),
            contracts: Some(2),
        }
    }

    #[test]
    fn converts_a_complete_row() {
        let position = Position::from_row(row(), 1).unwrap();
        assert_eq!(position.underlying, "XYZ");
        assert_eq!(position.option_type, OptionType::Call);
        assert_eq!(position.units(DEFAULT_CONTRACT_MULTIPLIER), 200.0);
    }

    #[test]
    fn missing_field_is_a_schema_error() {
        let mut raw = row();
        raw.expiry = None;
        let err = Position::from_row(raw, 7).unwrap_err();
        assert_eq!(
            err,
            HedgeError::SchemaError {
                table: "positions",
                row: 7,
                field: "Expiry"
            }
        );
    }

    #[test]
    fn bad_option_type_names_row_and_value() {
        let mut raw = row();
        raw.option_type = Some("Straddle".to_string());
        let err = Position::from_row(raw, 3).unwrap_err();
        match err {
            HedgeError::InvalidInput(msg) => {
                assert!(msg.contains("positions row 3 (XYZ)"), "{msg}");
                assert!(msg.contains("`Straddle`"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_strike() {
        let expiry = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(Position::new("XYZ", 0.0, expiry, OptionType::Call, 1.0, 1).is_err());
        assert!(Position::new(" ", 100.0, expiry, OptionType::Call, 1.0, 1).is_err());
        assert!(Position::new("XYZ", 100.0, expiry, OptionType::Call, f64::NAN, 1).is_err());
    }

    #[test]
    fn zero_contracts_are_accepted() {
        let expiry = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let position = Position::new("XYZ", 100.0, expiry, OptionType::Put, -1.0, 0).unwrap();
        assert_eq!(position.units(100.0), 0.0);
    }
}
