//! Core domain types, library-wide error structure, and serialization helpers.

pub mod serialization;
pub mod types;

pub use serialization::*;
pub use types::*;

/// Errors surfaced by the pricer, the hedge and PnL engines, and the table layer.
///
/// `InvalidInput` and `SchemaError` are fatal to a batch: the engines never emit
/// partial output after returning one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HedgeError {
    /// Domain-invalid value (bad option type, non-positive vol, duplicate key, ...).
    InvalidInput(String),
    /// A required field is absent from an input record.
    ///
    /// `row` is the 1-based data row; `0` refers to the header line.
    SchemaError {
        table: &'static str,
        row: usize,
        field: &'static str,
    },
    /// A cell or payload could not be decoded.
    Parse { table: &'static str, message: String },
    /// Underlying reader/writer failure.
    Io(String),
}

impl HedgeError {
    /// Prefixes an `InvalidInput` message with record context; other variants pass through.
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::InvalidInput(msg) => Self::InvalidInput(format!("{context}: {msg}")),
            other => other,
        }
    }
}

impl std::fmt::Display for HedgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::SchemaError { table, row: 0, field } => {
                write!(f, "schema error: {table} header is missing column `{field}`")
            }
            Self::SchemaError { table, row, field } => {
                write!(f, "schema error: {table} row {row} is missing required field `{field}`")
            }
            Self::Parse { table, message } => write!(f, "parse error in {table}: {message}"),
            Self::Io(msg) => write!(f, "i/o error: {msg}"),
        }
    }
}

impl std::error::Error for HedgeError {}

impl From<std::io::Error> for HedgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HedgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            table: "json",
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_table_row_and_field() {
        let err = HedgeError::SchemaError {
            table: "positions",
            row: 3,
            field: "Strike",
        };
        assert_eq!(
            err.to_string(),
            "schema error: positions row 3 is missing required field `Strike`"
        );

        let header = HedgeError::SchemaError {
            table: "market",
            row: 0,
            field: "Price",
        };
        assert_eq!(
            header.to_string(),
            "schema error: market header is missing column `Price`"
        );
    }

    #[test]
    fn context_only_decorates_invalid_input() {
        let err = HedgeError::InvalidInput("vol must be > 0".to_string())
            .with_context("XYZ on 2024-01-02");
        assert_eq!(
            err,
            HedgeError::InvalidInput("XYZ on 2024-01-02: vol must be > 0".to_string())
        );

        let io = HedgeError::Io("disk full".to_string()).with_context("ignored");
        assert_eq!(io, HedgeError::Io("disk full".to_string()));
    }
}
