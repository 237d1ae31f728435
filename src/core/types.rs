use std::fmt;
use std::str::FromStr;

use crate::core::HedgeError;

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Single-letter code used by position tables.
    pub fn code(self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::Put => "P",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parses `C`/`P` or `Call`/`Put`, ignoring case and surrounding whitespace.
impl FromStr for OptionType {
    type Err = HedgeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        if token.eq_ignore_ascii_case("c") || token.eq_ignore_ascii_case("call") {
            Ok(Self::Call)
        } else if token.eq_ignore_ascii_case("p") || token.eq_ignore_ascii_case("put") {
            Ok(Self::Put)
        } else {
            Err(HedgeError::InvalidInput(format!(
                "option type must be 'C' or 'P', got `{raw}`"
            )))
        }
    }
}
