//! End-to-end tests: pooled bucket handles over real stores.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::ObjectStore;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use tempfile::TempDir;

use silo::{Bucket, Pool, PoolConfig};

/// Pool whose factory hands out handles to one shared in-memory store,
/// counting constructions.
fn memory_pool(
    min_size: usize,
    max_size: usize,
) -> (Pool<Bucket>, Arc<InMemory>, Arc<AtomicUsize>) {
    let store = Arc::new(InMemory::new());
    let connects = Arc::new(AtomicUsize::new(0));

    let factory_store = store.clone();
    let factory_connects = connects.clone();
    let pool = Pool::new(
        PoolConfig {
            min_size,
            max_size,
            ..PoolConfig::default()
        },
        move || {
            factory_connects.fetch_add(1, Ordering::SeqCst);
            Ok(Bucket::with_store(
                "test-bucket",
                factory_store.clone(),
                "staging",
            ))
        },
    )
    .unwrap();

    (pool, store, connects)
}

#[tokio::test]
async fn test_pooled_bucket_roundtrip() {
    let (pool, store, _) = memory_pool(1, 4);
    pool.fill().unwrap();

    {
        let bucket = pool.acquire().unwrap();
        bucket.put("orders/1", Bytes::from_static(b"first")).await.unwrap();
    }

    // The write landed under the configured prefix.
    let raw = store
        .get(&object_store::path::Path::from("staging/orders/1"))
        .await
        .unwrap();
    assert_eq!(raw.bytes().await.unwrap().as_ref(), b"first");

    // A later borrow reuses the same idle handle and sees the data.
    let bucket = pool.acquire().unwrap();
    let value = bucket.get("orders/1").await.unwrap();
    assert_eq!(value.as_ref(), b"first");
}

#[tokio::test]
async fn test_overlapping_borrows_share_the_store() {
    let (pool, _, connects) = memory_pool(1, 2);
    pool.fill().unwrap();
    assert_eq!(connects.load(Ordering::SeqCst), 1);

    // Two live borrows: the second forces a fresh construction.
    let writer = pool.acquire().unwrap();
    let reader = pool.acquire().unwrap();
    assert_eq!(connects.load(Ordering::SeqCst), 2);

    writer.put("shared", Bytes::from_static(b"v")).await.unwrap();
    assert_eq!(reader.get("shared").await.unwrap().as_ref(), b"v");

    drop(writer);
    drop(reader);
    assert_eq!(pool.size(), 2);
}

#[tokio::test]
async fn test_drain_discards_idle_handles() {
    let (pool, _, connects) = memory_pool(2, 4);
    pool.fill().unwrap();
    assert_eq!(pool.size(), 2);

    pool.drain();
    assert_eq!(pool.size(), 0);

    // The next borrow constructs fresh.
    let before = connects.load(Ordering::SeqCst);
    let _bucket = pool.acquire().unwrap();
    assert_eq!(connects.load(Ordering::SeqCst), before + 1);
}

#[tokio::test]
async fn test_pooled_bucket_on_local_filesystem() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(LocalFileSystem::new_with_prefix(temp_dir.path()).unwrap());

    let factory_store = store.clone();
    let pool = Pool::new(PoolConfig::default(), move || {
        Ok(Bucket::with_store(
            "local-bucket",
            factory_store.clone(),
            "date=2026-08-07",
        ))
    })
    .unwrap();

    {
        let bucket = pool.acquire().unwrap();
        bucket.put("run-1/events", Bytes::from_static(b"{}")).await.unwrap();
        bucket.put("run-2/events", Bytes::from_static(b"{}")).await.unwrap();
    }

    let bucket = pool.acquire().unwrap();
    let mut keys: Vec<String> = bucket.keys().try_collect().await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["run-1/events", "run-2/events"]);

    // Keys round-trip through get and delete.
    assert_eq!(bucket.get("run-1/events").await.unwrap().as_ref(), b"{}");
    bucket.delete("run-1/events").await.unwrap();
    assert_eq!(bucket.get_opt("run-1/events").await.unwrap(), None);
}
