//! Module `rates::day_count`.
//!
//! Converts calendar date pairs into year fractions. The hedge engine uses this to turn
//! `expiry - snapshot date` into the time-to-expiry fed to the delta kernel.
//!
//! Key types and purpose: `DayCountConvention` selects the year basis; `year_fraction`
//! applies it.
//!
//! Numerical considerations: the default desk convention is Act/365 Fixed, so a
//! 365-day gap is exactly `1.0` and same-day expiry is exactly `0.0`, which routes the
//! pricer to its expiry branch without floating-point noise.
use chrono::{Datelike, NaiveDate};

/// Supported year-basis conventions for time-to-expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountConvention {
    /// Actual day count over a 365-day year.
    #[default]
    Act365Fixed,
    /// Actual day count over a 360-day year.
    Act360,
    /// ISDA actual/actual: each calendar year's days over that year's length.
    ActActIsda,
}

/// Computes the year fraction between two dates under a day-count convention.
///
/// Edge cases:
/// - If `start == end`, returns exactly `0.0`.
/// - If `start > end`, the result is negative and antisymmetric, so an expired
///   option yields a negative time-to-expiry.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use deltahedge::rates::{DayCountConvention, year_fraction};
///
/// let s = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
/// let e = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// assert_eq!(year_fraction(s, e, DayCountConvention::Act365Fixed), 1.0);
/// assert_eq!(
///     year_fraction(e, s, DayCountConvention::Act365Fixed),
///     -year_fraction(s, e, DayCountConvention::Act365Fixed)
/// );
/// ```
pub fn year_fraction(start: NaiveDate, end: NaiveDate, convention: DayCountConvention) -> f64 {
    if start == end {
        return 0.0;
    }
    if start > end {
        return -year_fraction(end, start, convention);
    }

    match convention {
        DayCountConvention::Act365Fixed => (end - start).num_days() as f64 / 365.0,
        DayCountConvention::Act360 => (end - start).num_days() as f64 / 360.0,
        DayCountConvention::ActActIsda => year_fraction_act_act_isda(start, end),
    }
}

fn year_fraction_act_act_isda(start: NaiveDate, end: NaiveDate) -> f64 {
    if start.year() == end.year() {
        return (end - start).num_days() as f64 / days_in_year(start.year()) as f64;
    }

    let first = days_in_year(start.year()) - start.ordinal0() as i32;
    let whole_years = (end.year() - start.year() - 1) as f64;
    first as f64 / days_in_year(start.year()) as f64
        + whole_years
        + end.ordinal0() as f64 / days_in_year(end.year()) as f64
}

fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) { 366 } else { 365 }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn act365_counts_calendar_days() {
        let yf = year_fraction(ymd(2024, 1, 1), ymd(2025, 1, 1), DayCountConvention::Act365Fixed);
        assert_relative_eq!(yf, 366.0 / 365.0, epsilon = 1e-15);
        assert_eq!(
            year_fraction(ymd(2024, 3, 1), ymd(2024, 3, 1), DayCountConvention::Act365Fixed),
            0.0
        );
    }

    #[test]
    fn act360_uses_360_day_year() {
        let yf = year_fraction(ymd(2025, 1, 1), ymd(2025, 7, 1), DayCountConvention::Act360);
        assert_relative_eq!(yf, 181.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn act_act_isda_splits_across_year_boundaries() {
        let yf = year_fraction(ymd(2023, 7, 1), ymd(2025, 3, 1), DayCountConvention::ActActIsda);
        let expected = 184.0 / 365.0 + 1.0 + 59.0 / 365.0;
        assert_relative_eq!(yf, expected, epsilon = 1e-12);

        let same_year =
            year_fraction(ymd(2024, 1, 1), ymd(2024, 12, 31), DayCountConvention::ActActIsda);
        assert_relative_eq!(same_year, 365.0 / 366.0, epsilon = 1e-12);
    }

    #[test]
    fn reversed_dates_are_negative() {
        for convention in [
            DayCountConvention::Act365Fixed,
            DayCountConvention::Act360,
            DayCountConvention::ActActIsda,
        ] {
            let fwd = year_fraction(ymd(2024, 2, 10), ymd(2024, 5, 20), convention);
            let back = year_fraction(ymd(2024, 5, 20), ymd(2024, 2, 10), convention);
            assert!(fwd > 0.0);
            assert_eq!(back, -fwd);
        }
    }
}
