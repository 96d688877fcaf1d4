//! Storage contract implemented by every backend.

use async_trait::async_trait;

use crate::domain::entities::{BatchItem, BatchShortened, InsertOutcome, UserUrl};
use crate::error::StoreResult;

/// Contract shared by the in-memory, file-journal and PostgreSQL
/// backends.
///
/// Implementations differ in guarantees, not in surface: only the
/// relational backend detects URL conflicts, honors soft-deletes and
/// serves statistics. The engine maps unsupported operations to
/// [`crate::error::StoreError::Unavailable`] rather than leaking backend
/// types.
///
/// Callers are expected to have validated inputs: `insert` is never
/// handed an empty URL (the engine rejects those with
/// [`crate::error::StoreError::Invalid`] first).
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Stores a URL for an owner and returns its short identifier.
    ///
    /// On the relational backend a URL that was already shortened yields
    /// a successful outcome with `conflict = true` and the existing
    /// identifier. The other backends overwrite last-write-wins and
    /// always report `conflict = false`.
    async fn insert(&self, url: &str, owner_id: &str) -> StoreResult<InsertOutcome>;

    /// Resolves a short identifier back to the original URL.
    ///
    /// # Errors
    ///
    /// [`crate::error::StoreError::NotFound`] if no entry matches;
    /// [`crate::error::StoreError::Gone`] if the entry is soft-deleted
    /// (relational backend only).
    async fn get(&self, short_id: &str) -> StoreResult<String>;

    /// Lists all live entries belonging to an owner. An empty list is a
    /// valid result, not an error.
    async fn get_user_urls(&self, owner_id: &str) -> StoreResult<Vec<UserUrl>>;

    /// Inserts a batch of URLs for one owner, all-or-nothing.
    ///
    /// Responses are correlated to requests by the caller-supplied
    /// correlation id. An empty URL anywhere in the batch fails the whole
    /// batch with [`crate::error::StoreError::Invalid`].
    async fn batch_insert(
        &self,
        items: &[BatchItem],
        owner_id: &str,
    ) -> StoreResult<Vec<BatchShortened>>;

    /// Soft-deletes the given entries, but only those owned by
    /// `owner_id`; rows belonging to other owners are silently left
    /// untouched. No-op on backends without a delete concept.
    async fn mark_deleted(&self, short_ids: &[String], owner_id: &str) -> StoreResult<()>;

    /// Liveness check against the underlying backend.
    async fn ping(&self) -> StoreResult<()>;

    /// Total number of stored URLs, deleted included. Relational backend
    /// only.
    async fn count_urls(&self) -> StoreResult<i64>;

    /// Number of distinct owners. Relational backend only.
    async fn count_users(&self) -> StoreResult<i64>;
}
