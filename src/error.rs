//! Error taxonomy shared by every storage backend.
//!
//! Backend-internal failures (sqlx, serde, io) are mapped into one of
//! these kinds before they cross the engine boundary; callers never see
//! a backend-specific error type.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry exists for the given short identifier.
    #[error("no URL for the given short id")]
    NotFound,

    /// The entry exists but has been soft-deleted.
    #[error("URL has been deleted")]
    Gone,

    /// The URL was already shortened; `short_id` refers to the existing
    /// entry. Insert surfaces this as a flag on a successful outcome,
    /// this variant exists for callers that want the error shape.
    #[error("original URL already shortened as {short_id}")]
    Conflict { short_id: String },

    /// The backend is unreachable, failed to initialize, or rejected the
    /// statement.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// Malformed input: empty URL, empty batch item.
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl StoreError {
    pub(crate) fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}
