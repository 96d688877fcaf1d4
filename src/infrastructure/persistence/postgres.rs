//! PostgreSQL backend.
//!
//! The only backend with multi-writer correctness guarantees: URL
//! uniqueness, conflict detection, soft-delete, transactional batches
//! and aggregate statistics.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::StorageConfig;
use crate::domain::entities::{BatchItem, BatchShortened, InsertOutcome, UserUrl};
use crate::domain::repositories::UrlStore;
use crate::error::{StoreError, StoreResult};
use crate::utils::short_id;

/// Upsert returning the short id plus a conflict marker in one round
/// trip. The inner INSERT is invisible to the outer SELECT, so exactly
/// one branch yields a row: a fresh insert reports `false`, a duplicate
/// `original_url` reports `true` with the pre-existing id.
const INSERT_STMT: &str = r#"
WITH ins AS (
    INSERT INTO short_urls (short_id, original_url, user_id)
    VALUES ($1, $2, $3)
    ON CONFLICT (original_url) DO NOTHING
    RETURNING short_id
)
SELECT short_id, FALSE AS conflict FROM ins
UNION ALL
SELECT short_id, TRUE FROM short_urls WHERE original_url = $2
LIMIT 1
"#;

const GET_STMT: &str = "SELECT original_url, deleted FROM short_urls WHERE short_id = $1 LIMIT 1";

const USER_URLS_STMT: &str = "SELECT short_id, original_url FROM short_urls \
     WHERE user_id = $1 AND NOT deleted ORDER BY id";

const BATCH_INSERT_STMT: &str = "INSERT INTO short_urls (short_id, original_url, user_id) \
     VALUES ($1, $2, $3) ON CONFLICT (original_url) DO NOTHING";

/// Ownership is checked per row inside the update: ids owned by someone
/// else are left untouched, not reported.
const MARK_DELETED_STMT: &str =
    "UPDATE short_urls SET deleted = TRUE WHERE short_id = ANY($1) AND user_id = $2";

const COUNT_URLS_STMT: &str = "SELECT COUNT(*) FROM short_urls";

const COUNT_USERS_STMT: &str = "SELECT COUNT(DISTINCT user_id) FROM short_urls";

/// PostgreSQL store over a bounded connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store from an existing connection pool.
    ///
    /// The schema must already be in place (see `migrations/`).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a bounded pool using the configured limits and applies
    /// pending migrations.
    pub async fn connect(config: &StorageConfig) -> StoreResult<Self> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::Invalid("database URL is not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
            .connect(url)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(StoreError::unavailable)?;

        info!("connected to database");
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl UrlStore for PgStore {
    async fn insert(&self, url: &str, owner_id: &str) -> StoreResult<InsertOutcome> {
        let (id, conflict): (String, bool) = sqlx::query_as(INSERT_STMT)
            .bind(short_id(url))
            .bind(url)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(InsertOutcome {
            short_id: id,
            conflict,
        })
    }

    async fn get(&self, short_id: &str) -> StoreResult<String> {
        let row: Option<(String, bool)> = sqlx::query_as(GET_STMT)
            .bind(short_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            None => Err(StoreError::NotFound),
            Some((_, true)) => Err(StoreError::Gone),
            Some((url, false)) => Ok(url),
        }
    }

    async fn get_user_urls(&self, owner_id: &str) -> StoreResult<Vec<UserUrl>> {
        let rows: Vec<(String, String)> = sqlx::query_as(USER_URLS_STMT)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|(short_id, original_url)| UserUrl {
                short_id,
                original_url,
            })
            .collect())
    }

    async fn batch_insert(
        &self,
        items: &[BatchItem],
        owner_id: &str,
    ) -> StoreResult<Vec<BatchShortened>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let mut shortened = Vec::with_capacity(items.len());
        for item in items {
            // Dropping the transaction rolls the whole batch back.
            if item.original_url.is_empty() {
                return Err(StoreError::Invalid(format!(
                    "empty URL for correlation id '{}'",
                    item.correlation_id
                )));
            }

            let id = short_id(&item.original_url);
            sqlx::query(BATCH_INSERT_STMT)
                .bind(&id)
                .bind(&item.original_url)
                .bind(owner_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

            shortened.push(BatchShortened {
                correlation_id: item.correlation_id.clone(),
                short_id: id,
            });
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(shortened)
    }

    async fn mark_deleted(&self, short_ids: &[String], owner_id: &str) -> StoreResult<()> {
        sqlx::query(MARK_DELETED_STMT)
            .bind(short_ids.to_vec())
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn count_urls(&self) -> StoreResult<i64> {
        sqlx::query_scalar(COUNT_URLS_STMT)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn count_users(&self) -> StoreResult<i64> {
        sqlx::query_scalar(COUNT_USERS_STMT)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
