//! Run configuration shared by the hedge engine and the command-line front end.

use std::path::Path;

use crate::core::{HedgeError, read_json_file};
use crate::instruments::DEFAULT_CONTRACT_MULTIPLIER;
use crate::rates::DayCountConvention;

/// What the hedge engine does when the pricer rejects a leg.
///
/// The policy applies to the whole run; it is never chosen per leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the batch on the first rejected leg; no partial output.
    #[default]
    Abort,
    /// Drop the rejected leg, log it at `warn`, and keep going.
    SkipLeg,
}

/// Tunables for a hedging run.
///
/// Every field has a default, so a JSON config file only needs the keys it overrides:
///
/// ```rust
/// use deltahedge::config::{FailurePolicy, HedgeConfig};
/// use deltahedge::core::from_json;
///
/// let cfg: HedgeConfig = from_json(r#"{ "failure_policy": "skip_leg" }"#).unwrap();
/// assert_eq!(cfg.contract_multiplier, 100.0);
/// assert_eq!(cfg.failure_policy, FailurePolicy::SkipLeg);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HedgeConfig {
    /// Share units per option contract.
    pub contract_multiplier: f64,
    /// Year basis for time-to-expiry.
    pub day_count: DayCountConvention,
    /// Handling of legs the pricer rejects.
    pub failure_policy: FailurePolicy,
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: DEFAULT_CONTRACT_MULTIPLIER,
            day_count: DayCountConvention::Act365Fixed,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl HedgeConfig {
    /// Loads a config from a JSON file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, HedgeError> {
        let config: Self = read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HedgeError> {
        if !self.contract_multiplier.is_finite() || self.contract_multiplier <= 0.0 {
            return Err(HedgeError::InvalidInput(format!(
                "contract multiplier must be finite and > 0, got {}",
                self.contract_multiplier
            )));
        }
        Ok(())
    }
}
