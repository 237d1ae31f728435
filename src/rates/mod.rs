//! Date conventions: year-fraction computation for time-to-expiry.

pub mod day_count;

pub use day_count::{DayCountConvention, year_fraction};
