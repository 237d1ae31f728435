//! Closed-form option analytics.

pub mod european;

pub use crate::core::types::OptionType;
pub use european::bs_delta;
