//! Append-only file journal wrapped around the in-memory backend.
//!
//! Every successful insert appends one newline-delimited JSON record
//! before the in-memory maps are updated; on startup the journal is
//! replayed so the memory state equals the union of all appended
//! records, last-write-wins per short id. Reads never touch the file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::entities::{BatchItem, BatchShortened, InsertOutcome, UserUrl};
use crate::domain::repositories::UrlStore;
use crate::error::{StoreError, StoreResult};
use crate::utils::short_id;

/// One journal line.
#[derive(Debug, Serialize, Deserialize)]
struct JournalRecord {
    short_id: String,
    original_url: String,
}

/// File-backed store: an in-memory store made durable by an append-only
/// journal.
pub struct FileStore {
    memory: super::MemoryStore,
    /// Single-writer discipline: all appends serialize on this lock.
    journal: Mutex<File>,
    path: PathBuf,
}

impl FileStore {
    /// Opens (creating if absent) the journal at `path` and replays it
    /// into memory.
    ///
    /// Individual records that fail to decode are logged and skipped;
    /// an unopenable journal fails activation with
    /// [`StoreError::Unavailable`].
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StoreError::unavailable)?;
            }
        }

        let memory = super::MemoryStore::new();
        restore(&path, &memory)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(StoreError::unavailable)?;

        Ok(Self {
            memory,
            journal: Mutex::new(file),
            path,
        })
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &JournalRecord) -> StoreResult<()> {
        let line = serde_json::to_string(record).map_err(StoreError::unavailable)?;

        let mut file = self.journal.lock().expect("journal lock poisoned");
        file.write_all(line.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.flush())
            .map_err(StoreError::unavailable)
    }

    /// Flushes the journal to disk and releases the file handle.
    pub fn close(self) -> StoreResult<()> {
        let file = self
            .journal
            .into_inner()
            .expect("journal lock poisoned");
        file.sync_all().map_err(StoreError::unavailable)
    }
}

/// Replays the journal sequentially into the in-memory store.
///
/// A missing file is an empty journal. The journal carries no owner, so
/// restored entries are reachable by id but absent from owner listings.
fn restore(path: &Path, memory: &super::MemoryStore) -> StoreResult<()> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(StoreError::unavailable(e)),
    };

    let mut restored = 0usize;
    let mut skipped = 0usize;

    for line in BufReader::new(file).lines() {
        let line = line.map_err(StoreError::unavailable)?;
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<JournalRecord>(&line) {
            Ok(record) => {
                memory.restore_record(record.short_id, record.original_url);
                restored += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping undecodable journal record");
                skipped += 1;
            }
        }
    }

    info!(restored, skipped, path = %path.display(), "journal restored");
    Ok(())
}

#[async_trait]
impl UrlStore for FileStore {
    async fn insert(&self, url: &str, owner_id: &str) -> StoreResult<InsertOutcome> {
        // Append before updating memory: a failed append must leave the
        // restore invariant intact.
        self.append(&JournalRecord {
            short_id: short_id(url),
            original_url: url.to_string(),
        })?;

        self.memory.insert(url, owner_id).await
    }

    async fn get(&self, short_id: &str) -> StoreResult<String> {
        self.memory.get(short_id).await
    }

    async fn get_user_urls(&self, owner_id: &str) -> StoreResult<Vec<UserUrl>> {
        self.memory.get_user_urls(owner_id).await
    }

    async fn batch_insert(
        &self,
        items: &[BatchItem],
        owner_id: &str,
    ) -> StoreResult<Vec<BatchShortened>> {
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

    async fn mark_deleted(&self, short_ids: &[String], owner_id: &str) -> StoreResult<()> {
        self.memory.mark_deleted(short_ids, owner_id).await
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn count_urls(&self) -> StoreResult<i64> {
        self.memory.count_urls().await
    }

    async fn count_users(&self) -> StoreResult<i64> {
        self.memory.count_users().await
    }
}
