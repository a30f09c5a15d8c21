use thiserror::Error;

/// Validation and configuration errors exposed by `tradesim-core`.
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
    #[error("instrument '{symbol}' is configured more than once")]
    DuplicateSymbol { symbol: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("lookback window must contain at least one period")]
    ZeroLookback,
    #[error("lookback of {periods} periods reaches before the earliest representable date")]
    LookbackOutOfRange { periods: usize },
    #[error("field '{field}' must be at least 1")]
    ZeroCapacity { field: &'static str },

    #[error("price point high must be >= low")]
    InvalidPointRange,
    #[error("price point open/close must be within high/low range")]
    InvalidPointBounds,

    #[error("correlation id must be 8 lowercase hex characters: '{value}'")]
    InvalidCorrelationId { value: String },

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnvValue { name: &'static str, value: String },
}
