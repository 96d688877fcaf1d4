#![allow(dead_code)]

use std::path::Path;

use shorturl::StorageEngine;
use shorturl::config::StorageConfig;
use shorturl::utils::short_id;
use sqlx::PgPool;

pub const URL_A: &str = "http://example.com/a";
pub const URL_B: &str = "http://example.com/b";

pub fn file_config(path: &Path) -> StorageConfig {
    StorageConfig {
        file_storage_path: Some(path.display().to_string()),
        ..StorageConfig::default()
    }
}

pub async fn open_file_engine(path: &Path) -> StorageEngine {
    StorageEngine::open(&file_config(path))
        .await
        .expect("file-backed engine failed to open")
}

pub async fn seed_entry(pool: &PgPool, url: &str, owner: &str) -> String {
    let id = short_id(url);
    sqlx::query("INSERT INTO short_urls (short_id, original_url, user_id) VALUES ($1, $2, $3)")
        .bind(&id)
        .bind(url)
        .bind(owner)
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn seed_deleted_entry(pool: &PgPool, url: &str, owner: &str) -> String {
    let id = short_id(url);
    sqlx::query(
        "INSERT INTO short_urls (short_id, original_url, user_id, deleted) VALUES ($1, $2, $3, TRUE)",
    )
    .bind(&id)
    .bind(url)
    .bind(owner)
    .execute(pool)
    .await
    .unwrap();
    id
}
