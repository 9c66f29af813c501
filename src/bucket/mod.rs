//! Key/value view over a remote object-storage bucket.
//!
//! [`Bucket`] is a thin shim over an [`ObjectStore`]: string keys in, byte
//! payloads out, with a configured path prefix applied to every operation.
//! It is the concrete connection type managed by the pool; one bucket
//! handle is cheap to hold but expensive to construct, which is exactly
//! the shape the pool exists for.

mod s3;

use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use snafu::prelude::*;

use crate::config::{BucketConfig, PoolConfig};
use crate::error::{ConfigError, ObjectStoreSnafu, StorageError};
use crate::pool::Pool;

/// Key/value surface over a single bucket (or a prefix within one).
///
/// All data operations qualify the key with the configured prefix, and
/// listings return keys relative to it, so a round-trip of
/// [`keys`](Self::keys) into [`get`](Self::get) always works.
#[derive(Clone)]
pub struct Bucket {
    name: String,
    prefix: Option<Path>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bucket<{}, prefix={}>",
            self.name,
            self.prefix.as_ref().map(|p| p.as_ref()).unwrap_or("/")
        )
    }
}

impl Bucket {
    /// Wrap a pre-built store.
    ///
    /// Skips credential handling entirely; useful when the caller already
    /// holds a connection, and for tests running against in-memory or
    /// filesystem-backed stores.
    pub fn with_store(
        name: impl Into<String>,
        store: Arc<dyn ObjectStore>,
        prefix: &str,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: normalize_prefix(prefix),
            store,
        }
    }

    /// Bucket name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured key prefix, normalized. `None` means the bucket root.
    pub fn prefix(&self) -> Option<&Path> {
        self.prefix.as_ref()
    }

    /// Get the contents stored under a key.
    ///
    /// A missing key surfaces as a [`StorageError`] for which
    /// [`is_not_found`](StorageError::is_not_found) returns true.
    pub async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.qualify(key);
        let response = self.store.get(&path).await.context(ObjectStoreSnafu)?;
        response.bytes().await.context(ObjectStoreSnafu)
    }

    /// Get the contents stored under a key, or `None` if the key does not
    /// exist. Only the not-found condition is suppressed; any other
    /// failure propagates.
    pub async fn get_opt(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        match self.get(key).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Store a value under a key, overwriting any existing value.
    pub async fn put(
        &self,
        key: &str,
        value: impl Into<PutPayload>,
    ) -> Result<(), StorageError> {
        let path = self.qualify(key);
        self.store
            .put(&path, value.into())
            .await
            .context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// Delete the value stored under a key.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.qualify(key);
        self.store.delete(&path).await.context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// Stream all keys in the bucket, relative to the configured prefix.
    pub fn keys(&self) -> impl Stream<Item = Result<String, StorageError>> + '_ {
        let prefix_parts = self
            .prefix
            .as_ref()
            .map(|prefix| prefix.parts().count())
            .unwrap_or_default();

        self.store.list(self.prefix.as_ref()).map(move |meta| {
            let meta = meta.context(ObjectStoreSnafu)?;
            // Strip the prefix so callers get keys that round-trip into
            // get/put/delete, which qualify paths.
            let relative: Path = meta.location.parts().skip(prefix_parts).collect();
            Ok(relative.to_string())
        })
    }

    /// Stream all values in the bucket.
    pub fn values(&self) -> impl Stream<Item = Result<Bytes, StorageError>> + '_ {
        self.keys()
            .and_then(move |key| async move { self.get(&key).await })
    }

    /// Stream `(key, value)` pairs for every key in the bucket.
    pub fn items(&self) -> impl Stream<Item = Result<(String, Bytes), StorageError>> + '_ {
        self.keys().and_then(move |key| async move {
            let value = self.get(&key).await?;
            Ok((key, value))
        })
    }

    /// Qualify a key with the configured prefix.
    fn qualify(&self, key: &str) -> Path {
        let key = Path::from(key);
        match &self.prefix {
            Some(prefix) => prefix.parts().chain(key.parts()).collect(),
            None => key,
        }
    }
}

/// Normalize a configured prefix; "/" and "" both mean the bucket root.
fn normalize_prefix(prefix: &str) -> Option<Path> {
    let path = Path::from(prefix);
    if path.as_ref().is_empty() {
        None
    } else {
        Some(path)
    }
}

impl Pool<Bucket> {
    /// Pool of handles to a single bucket.
    ///
    /// Captures the connection parameters and installs
    /// [`Bucket::connect`] as the factory; each construction forwards the
    /// same configuration.
    pub fn for_bucket(config: PoolConfig, bucket: BucketConfig) -> Result<Self, ConfigError> {
        Pool::new(config, move || Bucket::connect(&bucket))
    }
}
