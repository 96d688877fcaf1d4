mod common;

use shorturl::StorageEngine;
use shorturl::config::BackendKind;
use shorturl::error::StoreError;
use shorturl::utils::short_id;

#[tokio::test]
async fn test_restore_resolves_previous_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short_urls.jsonl");

    let id_a;
    let id_b;
    {
        let engine = common::open_file_engine(&path).await;
        id_a = engine.insert(common::URL_A, "user1").await.unwrap().short_id;
        id_b = engine.insert(common::URL_B, "user1").await.unwrap().short_id;
        engine.close().await.unwrap();
    }

    // A fresh engine on the same journal resolves without re-insertion
    let engine = common::open_file_engine(&path).await;
    assert_eq!(engine.backend_kind(), BackendKind::FileBacked);
    assert_eq!(engine.get(&id_a).await.unwrap(), common::URL_A);
    assert_eq!(engine.get(&id_b).await.unwrap(), common::URL_B);
}

#[tokio::test]
async fn test_identifiers_are_interchangeable_across_backends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short_urls.jsonl");

    let memory = StorageEngine::in_memory();
    let file = common::open_file_engine(&path).await;

    let from_memory = memory.insert(common::URL_A, "user1").await.unwrap().short_id;
    let from_file = file.insert(common::URL_A, "user1").await.unwrap().short_id;

    assert_eq!(from_memory, from_file);
    assert_eq!(from_memory, short_id(common::URL_A));
}

#[tokio::test]
async fn test_reinsert_survives_restart_with_single_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short_urls.jsonl");

    {
        let engine = common::open_file_engine(&path).await;
        engine.insert(common::URL_A, "user1").await.unwrap();
        engine.insert(common::URL_A, "user2").await.unwrap();
        engine.close().await.unwrap();
    }

    let engine = common::open_file_engine(&path).await;
    assert_eq!(engine.get(&short_id(common::URL_A)).await.unwrap(), common::URL_A);
}

#[tokio::test]
async fn test_unknown_id_after_restore_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short_urls.jsonl");

    {
        let engine = common::open_file_engine(&path).await;
        engine.insert(common::URL_A, "user1").await.unwrap();
        engine.close().await.unwrap();
    }

    let engine = common::open_file_engine(&path).await;
    match engine.get(&short_id(common::URL_B)).await {
        Err(StoreError::NotFound) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unopenable_journal_fails_activation() {
    let dir = tempfile::tempdir().unwrap();

    // The journal path is a directory: activation must fail instead of
    // silently downgrading to the in-memory backend
    match StorageEngine::open(&common::file_config(dir.path())).await {
        Err(StoreError::Unavailable(_)) => {}
        Ok(_) => panic!("expected activation failure"),
        Err(other) => panic!("expected Unavailable, got {other:?}"),
    }
}
