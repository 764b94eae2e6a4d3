use thiserror::Error;

/// Validation and contract errors exposed by `tradewise-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid risk profile '{value}', expected one of conservative, moderate, aggressive")]
    InvalidRiskProfile { value: String },
    #[error("invalid horizon '{value}', expected one of short, medium, long")]
    InvalidHorizon { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("column label cannot be empty")]
    EmptyColumnLabel,
    #[error("duplicate column label '{label}'")]
    DuplicateColumn { label: String },
    #[error("column '{label}' has {len} values, expected {expected}")]
    RaggedColumn {
        label: String,
        len: usize,
        expected: usize,
    },
    #[error("column '{label}' holds a non-finite value at index {index}")]
    NonFiniteObservation { label: String, index: usize },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
