use goldrun_warehouse::WarehouseError;
use thiserror::Error;

/// Validation errors for operator-supplied identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} cannot be empty")]
    EmptyIdentifier { kind: &'static str },
    #[error("{kind} length {len} exceeds max {max}")]
    IdentifierTooLong {
        kind: &'static str,
        len: usize,
        max: usize,
    },
    #[error("{kind} must start with an ASCII letter or '_': '{ch}'")]
    IdentifierInvalidStart { kind: &'static str, ch: char },
    #[error("{kind} contains invalid character '{ch}' at index {index}")]
    IdentifierInvalidChar {
        kind: &'static str,
        ch: char,
        index: usize,
    },
}

/// Top-level error type for metrics runs and schema bootstrap.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    /// An aggregate query returned no row or the wrong number of columns.
    #[error("{query} query returned an unexpected shape: {detail}")]
    UnexpectedShape { query: &'static str, detail: String },

    /// The preview result set lacks a column the report line needs.
    #[error("preview row is missing column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
