//! Module `market::snapshot`.
//!
//! End-of-day market observation for one underlying: spot, flat rate, implied vol, and
//! continuous dividend yield. The hedge engine consumes one snapshot per
//! `(date, underlying)` and rejects duplicates.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::HedgeError;
use crate::tables::rows::{MARKET_TABLE, MarketRow, required};

/// Market state for one underlying on one date.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketSnapshot {
    /// Observation date.
    pub date: NaiveDate,
    /// Underlying instrument identifier.
    pub underlying: String,
    /// Spot price.
    pub price: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Annualized implied volatility.
    pub implied_vol: f64,
    /// Continuously compounded dividend yield.
    #[serde(default)]
    pub dividend_yield: f64,
}

impl MarketSnapshot {
    /// Starts a snapshot builder.
    #[inline]
    pub fn builder(date: NaiveDate, underlying: impl Into<String>) -> MarketSnapshotBuilder {
        MarketSnapshotBuilder {
            date,
            underlying: underlying.into(),
            price: None,
            rate: None,
            implied_vol: None,
            dividend_yield: None,
        }
    }

    /// Validates snapshot fields.
    pub fn validate(&self) -> Result<(), HedgeError> {
        if self.underlying.trim().is_empty() {
            return Err(HedgeError::InvalidInput(
                "snapshot underlying must be non-empty".to_string(),
            ));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(HedgeError::InvalidInput(format!(
                "snapshot price must be finite and > 0, got {}",
                self.price
            )));
        }
        if !self.rate.is_finite() {
            return Err(HedgeError::InvalidInput(format!(
                "snapshot rate must be finite, got {}",
                self.rate
            )));
        }
        if !self.implied_vol.is_finite() || self.implied_vol < 0.0 {
            return Err(HedgeError::InvalidInput(format!(
                "snapshot implied vol must be finite and >= 0, got {}",
                self.implied_vol
            )));
        }
        if !self.dividend_yield.is_finite() {
            return Err(HedgeError::InvalidInput(format!(
                "snapshot dividend yield must be finite, got {}",
                self.dividend_yield
            )));
        }
        Ok(())
    }

    /// Converts a raw table row; a blank or absent `DividendYield` becomes `0.0`.
    pub fn from_row(raw: MarketRow, row: usize) -> Result<Self, HedgeError> {
        let table = MARKET_TABLE;
        let date = required(raw.date, table, row, "Date")?;
        let underlying = required(raw.underlying, table, row, "Underlying")?;
        let price = required(raw.price, table, row, "Price")?;
        let rate = required(raw.rate, table, row, "Rate")?;
        let implied_vol = required(raw.implied_vol, table, row, "ImpliedVol")?;

        let context = format!("{table} row {row} ({underlying} on {date})");
        let mut builder = Self::builder(date, underlying)
            .price(price)
            .rate(rate)
            .implied_vol(implied_vol);
        if let Some(q) = raw.dividend_yield {
            builder = builder.dividend_yield(q);
        }
        builder.build().map_err(|err| err.with_context(context))
    }
}

/// Builder for [`MarketSnapshot`].
#[derive(Debug, Clone)]
pub struct MarketSnapshotBuilder {
    date: NaiveDate,
    underlying: String,
    price: Option<f64>,
    rate: Option<f64>,
    implied_vol: Option<f64>,
    dividend_yield: Option<f64>,
}

impl MarketSnapshotBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the flat risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the implied volatility.
    #[inline]
    pub fn implied_vol(mut self, implied_vol: f64) -> Self {
        self.implied_vol = Some(implied_vol);
        self
    }

    /// Sets the continuous dividend yield.
    #[inline]
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    /// Validates and builds a [`MarketSnapshot`].
    ///
    /// Price, rate and implied vol are required; only the dividend yield defaults to zero.
    pub fn build(self) -> Result<MarketSnapshot, HedgeError> {
        let price = self
            .price
            .ok_or_else(|| HedgeError::InvalidInput("snapshot price is required".to_string()))?;
        let rate = self
            .rate
            .ok_or_else(|| HedgeError::InvalidInput("snapshot rate is required".to_string()))?;
        let implied_vol = self.implied_vol.ok_or_else(|| {
            HedgeError::InvalidInput("snapshot implied vol is required".to_string())
        })?;

        let snapshot = MarketSnapshot {
            date: self.date,
            underlying: self.underlying,
            price,
            rate,
            implied_vol,
            dividend_yield: self.dividend_yield.unwrap_or(0.0),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Snapshots grouped by date, then by underlying, in ascending order.
pub type SnapshotIndex<'a> = BTreeMap<NaiveDate, BTreeMap<&'a str, &'a MarketSnapshot>>;

/// Groups snapshots by date and underlying, rejecting duplicate `(date, underlying)` keys.
pub fn index_by_date(snapshots: &[MarketSnapshot]) -> Result<SnapshotIndex<'_>, HedgeError> {
    let mut index = SnapshotIndex::new();
    for snapshot in snapshots {
        let day = index.entry(snapshot.date).or_default();
        if day.insert(snapshot.underlying.as_str(), snapshot).is_some() {
            return Err(HedgeError::InvalidInput(format!(
                "duplicate market snapshot for {} on {}",
                snapshot.underlying, snapshot.date
            )));
        }
    }
    Ok(index)
}
