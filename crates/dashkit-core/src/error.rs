use thiserror::Error;

/// Validation and contract errors exposed by `dashkit-core`.
///
/// Every variant is raised before any network call or state change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query cannot be empty")]
    EmptyQuery,

    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol cannot start with separator '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid sort order '{value}', expected one of price-asc, price-desc, change-desc")]
    InvalidSortOrder { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("todo text cannot be empty")]
    EmptyTodo,
    #[error("no todo with id '{id}'")]
    UnknownTodo { id: String },

    #[error("track index {index} is out of range for a playlist of {len}")]
    TrackOutOfRange { index: usize, len: usize },
    #[error("playlist must contain at least one track")]
    EmptyPlaylist,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] dashkit_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
