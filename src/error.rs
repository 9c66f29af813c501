//! Error types for pool construction, connection factories, and storage
//! operations.

use snafu::prelude::*;

// ============ Config Errors ============

/// Errors that can occur during configuration validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Pool sizing is inverted.
    #[snafu(display("Pool min_size ({min_size}) cannot exceed max_size ({max_size})"))]
    PoolSizing { min_size: usize, max_size: usize },

    /// Access key id is required when no pre-built store is supplied.
    #[snafu(display("Missing access key id for bucket '{bucket}'"))]
    MissingAccessKeyId { bucket: String },

    /// Secret access key is required when no pre-built store is supplied.
    #[snafu(display("Missing secret access key for bucket '{bucket}'"))]
    MissingSecretAccessKey { bucket: String },
}

// ============ Connect Errors ============

/// Errors that can occur while establishing a new connection.
///
/// Raised synchronously from [`Pool::acquire`](crate::pool::Pool::acquire)
/// or [`Pool::fill`](crate::pool::Pool::fill) when the factory fails. The
/// pool never retries; the caller decides.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConnectError {
    /// Connection configuration is invalid or incomplete.
    #[snafu(display("Invalid connection credentials"))]
    Credentials { source: ConfigError },

    /// S3 client construction failed.
    #[snafu(display("S3 configuration error for bucket '{bucket}'"))]
    S3Config {
        bucket: String,
        source: object_store::Error,
    },
}

// ============ Storage Errors ============

/// Errors that can occur during storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// Object store operation failed.
    #[snafu(display("Storage operation failed: {source}"))]
    ObjectStore { source: object_store::Error },
}

impl StorageError {
    /// Check if this error represents a "not found" condition (404, NoSuchKey, etc.)
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::ObjectStore { source } => {
                matches!(source, object_store::Error::NotFound { .. })
            }
        }
    }
}
