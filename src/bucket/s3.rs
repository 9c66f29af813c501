//! S3 connection factory.

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use snafu::prelude::*;

use crate::config::BucketConfig;
use crate::error::{
    ConnectError, CredentialsSnafu, MissingAccessKeyIdSnafu, MissingSecretAccessKeySnafu,
    S3ConfigSnafu,
};

use super::{Bucket, normalize_prefix};

/// Builder option controlling server-side encryption.
const SSE_OPTION: &str = "aws_server_side_encryption";

impl Bucket {
    /// Construct a bucket handle with the given name, credentials, path
    /// prefix, and region.
    ///
    /// Building the client is pure configuration with no network
    /// handshake, so construction is synchronous; connection state is
    /// established lazily by the first request. Both credential halves are
    /// required; use [`Bucket::with_store`] to supply a pre-built
    /// connection instead.
    ///
    /// Objects are written with AES256 server-side encryption unless
    /// `options` overrides `aws_server_side_encryption`.
    pub fn connect(config: &BucketConfig) -> Result<Self, ConnectError> {
        let access_key_id = config
            .access_key_id
            .as_deref()
            .context(MissingAccessKeyIdSnafu {
                bucket: config.name.clone(),
            })
            .context(CredentialsSnafu)?;

        let secret_access_key = config
            .secret_access_key
            .as_deref()
            .context(MissingSecretAccessKeySnafu {
                bucket: config.name.clone(),
            })
            .context(CredentialsSnafu)?;

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(config.name.clone())
            .with_region(config.region.clone())
            .with_access_key_id(access_key_id)
            .with_secret_access_key(secret_access_key);

        if !config.options.contains_key(SSE_OPTION) {
            builder = builder.with_config(
                SSE_OPTION.parse().context(S3ConfigSnafu {
                    bucket: config.name.clone(),
                })?,
                "AES256",
            );
        }

        for (key, value) in &config.options {
            builder = builder.with_config(
                key.parse().context(S3ConfigSnafu {
                    bucket: config.name.clone(),
                })?,
                value.clone(),
            );
        }

        if let Some(endpoint) = &config.endpoint {
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_virtual_hosted_style_request(false)
                .with_allow_http(true);
        }

        let store = builder.build().context(S3ConfigSnafu {
            bucket: config.name.clone(),
        })?;

        Ok(Self {
            name: config.name.clone(),
            prefix: normalize_prefix(&config.prefix),
            store: Arc::new(store),
        })
    }
}
