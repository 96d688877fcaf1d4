//! Storage engine: backend selection, dispatch and input validation.

use tracing::info;

use crate::config::{BackendKind, StorageConfig};
use crate::domain::entities::{BatchItem, BatchShortened, InsertOutcome, UserUrl};
use crate::domain::repositories::UrlStore;
use crate::error::{StoreError, StoreResult};
use crate::infrastructure::persistence::{FileStore, MemoryStore, PgStore};

/// Exactly one backend is active per engine; invalid combinations are
/// unrepresentable.
enum Backend {
    InMemory(MemoryStore),
    FileBacked(FileStore),
    Relational(PgStore),
}

/// Façade over the active persistence backend.
///
/// Owns the backend for its whole lifetime: construction performs
/// activation (connect, migrate, journal restore) and only returns a
/// ready engine; [`StorageEngine::close`] consumes the engine, so no
/// operation can run before readiness or after shutdown.
///
/// The engine validates inputs and translates every backend outcome into
/// the shared [`StoreError`] taxonomy; backend-specific types never
/// cross this boundary.
///
/// All operations are async and safe to cancel by dropping the future:
/// no lock is held across an await point and an open database
/// transaction rolls back when its future is dropped.
pub struct StorageEngine {
    backend: Backend,
}

impl StorageEngine {
    /// Activates the backend selected by the configuration.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the journal cannot be opened or
    /// the database is unreachable. There is no fallback to a weaker
    /// backend: a configured-but-broken journal or database fails
    /// startup.
    pub async fn open(config: &StorageConfig) -> StoreResult<Self> {
        let backend = match config.backend() {
            BackendKind::Relational => Backend::Relational(PgStore::connect(config).await?),
            BackendKind::FileBacked => {
                let path = config.file_storage_path.as_deref().ok_or_else(|| {
                    StoreError::Invalid("file storage path is not configured".to_string())
                })?;
                Backend::FileBacked(FileStore::open(path)?)
            }
            BackendKind::InMemory => Backend::InMemory(MemoryStore::new()),
        };

        info!(backend = ?config.backend(), "storage engine ready");
        Ok(Self { backend })
    }

    /// An engine over a fresh in-memory backend, no configuration
    /// required.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::InMemory(MemoryStore::new()),
        }
    }

    /// Which backend this engine runs on.
    pub fn backend_kind(&self) -> BackendKind {
        match self.backend {
            Backend::InMemory(_) => BackendKind::InMemory,
            Backend::FileBacked(_) => BackendKind::FileBacked,
            Backend::Relational(_) => BackendKind::Relational,
        }
    }

    fn store(&self) -> &dyn UrlStore {
        match &self.backend {
            Backend::InMemory(store) => store,
            Backend::FileBacked(store) => store,
            Backend::Relational(store) => store,
        }
    }

    /// Stores a URL and returns its short identifier.
    ///
    /// `conflict = true` on the outcome means the URL was already
    /// shortened and the identifier refers to the existing entry
    /// (relational backend only).
    ///
    /// # Errors
    ///
    /// [`StoreError::Invalid`] for an empty URL.
    pub async fn insert(&self, url: &str, owner_id: &str) -> StoreResult<InsertOutcome> {
        if url.is_empty() {
            return Err(StoreError::Invalid("empty URL".to_string()));
        }

        self.store().insert(url, owner_id).await
    }

    /// Resolves a short identifier to the original URL.
    pub async fn get(&self, short_id: &str) -> StoreResult<String> {
        self.store().get(short_id).await
    }

    /// Lists an owner's URLs; an empty list is a valid result.
    pub async fn get_user_urls(&self, owner_id: &str) -> StoreResult<Vec<UserUrl>> {
        self.store().get_user_urls(owner_id).await
    }

    /// Inserts a batch of URLs, all-or-nothing.
    ///
    /// # Errors
    ///
    /// [`StoreError::Invalid`] for an empty batch or an empty URL in any
    /// item; nothing is persisted in either case.
    pub async fn batch_insert(
        &self,
        items: &[BatchItem],
        owner_id: &str,
    ) -> StoreResult<Vec<BatchShortened>> {
        if items.is_empty() {
            return Err(StoreError::Invalid("empty batch".to_string()));
        }

        self.store().batch_insert(items, owner_id).await
    }

    /// Soft-deletes the given identifiers where owned by `owner_id`;
    /// other owners' entries are silently skipped.
    pub async fn mark_deleted(&self, short_ids: &[String], owner_id: &str) -> StoreResult<()> {
        if short_ids.is_empty() {
            return Ok(());
        }

        self.store().mark_deleted(short_ids, owner_id).await
    }

    /// Backend liveness check.
    pub async fn ping(&self) -> StoreResult<()> {
        self.store().ping().await
    }

    /// Total stored URLs (relational backend only).
    pub async fn count_urls(&self) -> StoreResult<i64> {
        self.store().count_urls().await
    }

    /// Distinct owners (relational backend only).
    pub async fn count_users(&self) -> StoreResult<i64> {
        self.store().count_users().await
    }

    /// Shuts the engine down: flushes and releases the journal, closes
    /// the connection pool. Consumes the engine, so no further
    /// operations are possible.
    pub async fn close(self) -> StoreResult<()> {
        match self.backend {
            Backend::InMemory(_) => Ok(()),
            Backend::FileBacked(store) => store.close(),
            Backend::Relational(store) => {
                store.close().await;
                Ok(())
            }
        }
    }
}
