//! Process-local in-memory backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::{BatchItem, BatchShortened, InsertOutcome, ShortEntry, UserUrl};
use crate::domain::repositories::UrlStore;
use crate::error::{StoreError, StoreResult};
use crate::utils::short_id;

/// Primary map plus owner index, both guarded by a single lock so they
/// cannot diverge under concurrent inserts.
#[derive(Default)]
struct Inner {
    /// short_id -> original_url
    urls: HashMap<String, String>,
    /// owner_id -> entries in insertion order
    by_owner: HashMap<String, Vec<ShortEntry>>,
}

/// In-memory backend: unbounded, lost on restart unless paired with the
/// file journal.
///
/// Inserts overwrite last-write-wins; there is no conflict detection and
/// no delete concept. `mark_deleted` is a successful no-op and the
/// statistics operations report [`StoreError::Unavailable`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays one journal record into the primary map.
    ///
    /// Used by the file backend's restore pass. The journal carries no
    /// owner, so the owner index is not touched.
    pub(crate) fn restore_record(&self, short_id: String, original_url: String) {
        let mut inner = self.inner.write().expect("memory store lock poisoned");
        inner.urls.insert(short_id, original_url);
    }

    /// Number of entries in the primary map.
    pub fn len(&self) -> usize {
        self.inner.read().expect("memory store lock poisoned").urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UrlStore for MemoryStore {
    async fn insert(&self, url: &str, owner_id: &str) -> StoreResult<InsertOutcome> {
        let id = short_id(url);

        let mut inner = self.inner.write().expect("memory store lock poisoned");
        inner.urls.insert(id.clone(), url.to_string());
        inner
            .by_owner
            .entry(owner_id.to_string())
            .or_default()
            .push(ShortEntry {
                short_id: id.clone(),
                original_url: url.to_string(),
                owner_id: owner_id.to_string(),
                deleted: false,
            });

        Ok(InsertOutcome::new(id))
    }

    async fn get(&self, short_id: &str) -> StoreResult<String> {
        let inner = self.inner.read().expect("memory store lock poisoned");
        inner.urls.get(short_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_user_urls(&self, owner_id: &str) -> StoreResult<Vec<UserUrl>> {
        let inner = self.inner.read().expect("memory store lock poisoned");
        let urls = inner
            .by_owner
            .get(owner_id)
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| UserUrl {
                        short_id: e.short_id.clone(),
                        original_url: e.original_url.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(urls)
    }

    async fn batch_insert(
        &self,
        items: &[BatchItem],
        owner_id: &str,
    ) -> StoreResult<Vec<BatchShortened>> {
        // Validate everything up front so a bad item leaves no partial
        // state behind.
        for item in items {
            if item.original_url.is_empty() {
                return Err(StoreError::Invalid(format!(
                    "empty URL for correlation id '{}'",
                    item.correlation_id
                )));
            }
        }

        let mut shortened = Vec::with_capacity(items.len());
        for item in items {
            let outcome = self.insert(&item.original_url, owner_id).await?;
            shortened.push(BatchShortened {
                correlation_id: item.correlation_id.clone(),
                short_id: outcome.short_id,
            });
        }

        Ok(shortened)
    }

    async fn mark_deleted(&self, short_ids: &[String], _owner_id: &str) -> StoreResult<()> {
        // Soft-delete only exists on the relational backend.
        debug!(count = short_ids.len(), "mark_deleted ignored by in-memory backend");
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn count_urls(&self) -> StoreResult<i64> {
        Err(StoreError::Unavailable(
            "statistics require the relational backend".to_string(),
        ))
    }

    async fn count_users(&self) -> StoreResult<i64> {
        Err(StoreError::Unavailable(
            "statistics require the relational backend".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_get_round_trips() {
        let store = MemoryStore::new();

        let outcome = store.insert("http://example.com/a", "user1").await.unwrap();
        assert!(!outcome.conflict);

        let url = store.get(&outcome.short_id).await.unwrap();
        assert_eq!(url, "http://example.com/a");
    }

    #[tokio::test]
    async fn test_get_missing_id_is_not_found() {
        let store = MemoryStore::new();

        match store.get("nonexistent-id").await {
            Err(StoreError::NotFound) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reinsert_overwrites_silently() {
        let store = MemoryStore::new();

        let first = store.insert("http://example.com/a", "user1").await.unwrap();
        let second = store.insert("http://example.com/a", "user2").await.unwrap();

        // Content addressing: same URL, same id, no conflict reported
        assert_eq!(first.short_id, second.short_id);
        assert!(!second.conflict);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_owner_index_tracks_inserts() {
        let store = MemoryStore::new();

        store.insert("http://example.com/a", "user1").await.unwrap();
        store.insert("http://example.com/b", "user1").await.unwrap();
        store.insert("http://example.com/c", "user2").await.unwrap();

        let urls = store.get_user_urls("user1").await.unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].original_url, "http://example.com/a");
        assert_eq!(urls[1].original_url, "http://example.com/b");
    }

    #[tokio::test]
    async fn test_unknown_owner_gets_empty_list() {
        let store = MemoryStore::new();
        let urls = store.get_user_urls("owner-with-no-entries").await.unwrap();
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn test_batch_insert_correlates_responses() {
        let store = MemoryStore::new();
        let items = vec![
            BatchItem {
                correlation_id: "c1".to_string(),
                original_url: "http://example.com/a".to_string(),
            },
            BatchItem {
                correlation_id: "c2".to_string(),
                original_url: "http://example.com/b".to_string(),
            },
        ];

        let shortened = store.batch_insert(&items, "user1").await.unwrap();

        assert_eq!(shortened.len(), 2);
        assert_eq!(shortened[0].correlation_id, "c1");
        assert_eq!(shortened[0].short_id, short_id("http://example.com/a"));
        assert_eq!(shortened[1].correlation_id, "c2");
    }

    #[tokio::test]
    async fn test_batch_insert_rejects_empty_url_without_partial_state() {
        let store = MemoryStore::new();
        let items = vec![
            BatchItem {
                correlation_id: "c1".to_string(),
                original_url: "http://example.com/a".to_string(),
            },
            BatchItem {
                correlation_id: "c2".to_string(),
                original_url: String::new(),
            },
        ];

        match store.batch_insert(&items, "user1").await {
            Err(StoreError::Invalid(_)) => {}
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mark_deleted_is_a_noop() {
        let store = MemoryStore::new();
        let outcome = store.insert("http://example.com/a", "user1").await.unwrap();

        store
            .mark_deleted(&[outcome.short_id.clone()], "user1")
            .await
            .unwrap();

        // No delete concept here: the entry still resolves
        assert_eq!(store.get(&outcome.short_id).await.unwrap(), "http://example.com/a");
    }

    #[tokio::test]
    async fn test_counts_are_unavailable() {
        let store = MemoryStore::new();
        assert!(matches!(store.count_urls().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(store.count_users().await, Err(StoreError::Unavailable(_))));
    }
}
