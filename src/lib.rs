//! # shorturl
//!
//! A URL-shortening storage engine: deterministic content-addressed
//! short identifiers over three interchangeable persistence backends.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Record types and the storage contract
//! - **Application Layer** ([`application`]) - The [`StorageEngine`] façade
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory, file-journal
//!   and PostgreSQL backends
//!
//! ## Backends
//!
//! Exactly one backend is active per engine, selected at startup:
//!
//! - **In-memory** - process-local maps, lost on restart
//! - **File-journal** - in-memory maps made durable by an append-only
//!   newline-delimited JSON journal, replayed on startup
//! - **PostgreSQL** - the only backend with URL uniqueness, conflict
//!   detection, soft-delete, transactional batches and statistics
//!
//! ## Quick Start
//!
//! ```no_run
//! use shorturl::config::load_from_env;
//! use shorturl::StorageEngine;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = load_from_env()?;
//! let engine = StorageEngine::open(&config).await?;
//!
//! let outcome = engine.insert("https://example.com/some/long/path", "user1").await?;
//! let original = engine.get(&outcome.short_id).await?;
//! assert_eq!(original, "https://example.com/some/long/path");
//!
//! engine.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Backend selection is driven by environment variables; see [`config`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use application::engine::StorageEngine;
pub use error::{StoreError, StoreResult};

/// Commonly used types for external consumers.
pub mod prelude {
    pub use crate::application::engine::StorageEngine;
    pub use crate::config::{BackendKind, StorageConfig};
    pub use crate::domain::entities::{BatchItem, BatchShortened, InsertOutcome, UserUrl};
    pub use crate::error::{StoreError, StoreResult};
}
