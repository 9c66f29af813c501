//! Pool and bucket configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PoolSizingSnafu};
use snafu::ensure;

fn default_min_size() -> usize {
    1
}

fn default_max_size() -> usize {
    1024
}

fn default_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_prefix() -> String {
    "/".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Sizing policy for a connection pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolConfig {
    /// Target number of idle connections kept warm.
    #[serde(default = "default_min_size")]
    pub min_size: usize,

    /// Hard cap on idle connections retained. Not a cap on connections
    /// ever created: acquisition never blocks waiting for a slot.
    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// Accepted for a future bounded-wait acquire mode; nothing consults
    /// it today. Acquisition is always non-blocking-then-construct.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
            timeout: default_timeout(),
        }
    }
}

impl PoolConfig {
    /// Validate the sizing invariant `min_size <= max_size`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            self.min_size <= self.max_size,
            PoolSizingSnafu {
                min_size: self.min_size,
                max_size: self.max_size,
            }
        );
        Ok(())
    }
}

/// Connection parameters for an S3-backed bucket.
///
/// Forwarded verbatim to the connection factory on every construction.
/// Credentials are required unless the bucket is built around a pre-built
/// store via [`Bucket::with_store`](crate::bucket::Bucket::with_store).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketConfig {
    /// Bucket name.
    pub name: String,

    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Path prefix applied to every key. Leading and trailing slashes are
    /// normalized away.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint, e.g. for S3-compatible stores or local test
    /// containers. Plain-http endpoints are allowed.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Extra client options passed through to the S3 builder, keyed by the
    /// builder's configuration names (e.g. `aws_server_side_encryption`).
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl BucketConfig {
    /// Create a configuration with explicit credentials and defaults for
    /// everything else.
    pub fn new(
        name: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            prefix: default_prefix(),
            region: default_region(),
            endpoint: None,
            options: HashMap::new(),
        }
    }
}
