//! silo: pooled key/value access to object-storage buckets.
//!
//! This library provides a generic, bounded connection pool and a thin
//! key/value view over an S3-backed bucket. Callers borrow a bucket handle
//! from the pool, use it, and return it on scope exit without paying
//! construction cost on every use.
//!
//! # Example
//!
//! ```ignore
//! use silo::{Bucket, BucketConfig, Pool, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = Pool::for_bucket(
//!         PoolConfig::default(),
//!         BucketConfig::new("logs", "AKIA...", "secret..."),
//!     )?;
//!     pool.fill()?;
//!
//!     let bucket = pool.acquire()?;
//!     bucket.put("greeting", bytes::Bytes::from("hello")).await?;
//!     let value = bucket.get("greeting").await?;
//!     println!("{} bytes", value.len());
//!     Ok(())
//! }
//! ```

pub mod bucket;
pub mod config;
pub mod error;
pub mod pool;

// Re-export main types
pub use bucket::Bucket;
pub use config::{BucketConfig, PoolConfig};
pub use error::{ConfigError, ConnectError, StorageError};
pub use pool::{Pool, PooledConnection};
