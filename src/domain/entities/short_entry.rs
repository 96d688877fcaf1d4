//! Core record types for the URL <-> identifier <-> owner mapping.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A stored short-URL record.
///
/// Created exactly once at insert time and never updated except to flip
/// `deleted`. The short identifier is derived from the URL content, so
/// the same URL always maps to the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortEntry {
    pub short_id: String,
    pub original_url: String,
    /// Owner of the entry; empty for anonymous or system inserts.
    pub owner_id: String,
    /// Soft-delete flag; a deleted entry is excluded from resolution but
    /// kept for statistics.
    pub deleted: bool,
}

/// One row of a per-owner listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUrl {
    pub short_id: String,
    pub original_url: String,
}

/// One item of a batch-insert request.
///
/// The correlation id is supplied by the caller and echoed back in the
/// response so items can be matched without knowing the content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub correlation_id: String,
    pub original_url: String,
}

/// One item of a batch-insert response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchShortened {
    pub correlation_id: String,
    pub short_id: String,
}

/// Result of an insert.
///
/// `conflict` is a successful outcome, not a failure: the URL was already
/// shortened and `short_id` refers to the pre-existing entry. Only the
/// relational backend ever reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub short_id: String,
    pub conflict: bool,
}

impl InsertOutcome {
    pub fn new(short_id: impl Into<String>) -> Self {
        Self {
            short_id: short_id.into(),
            conflict: false,
        }
    }

    pub fn conflicting(short_id: impl Into<String>) -> Self {
        Self {
            short_id: short_id.into(),
            conflict: true,
        }
    }

    /// Converts a conflicting outcome into [`StoreError::Conflict`].
    ///
    /// For callers that surface conflicts on the error path (a 409
    /// mapping); the existing short id travels inside the error.
    pub fn ok_or_conflict(self) -> Result<String, StoreError> {
        if self.conflict {
            Err(StoreError::Conflict {
                short_id: self.short_id,
            })
        } else {
            Ok(self.short_id)
        }
    }
}
