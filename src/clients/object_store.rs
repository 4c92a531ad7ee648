//! Thin wrapper over the S3 SDK for the console's buckets. Stateless and
//! idempotent at object-key granularity.

use std::time::Duration;

use anyhow::{Context, Result};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::config::Buckets;

/// Presigned GET expiry. Long enough for slow downloads of large PSDs.
pub const DOWNLOAD_URL_EXPIRY: Duration = Duration::from_secs(3600);
/// Presigned PUT expiry. Uploads start immediately after the URL is issued.
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(900);

#[derive(Clone)]
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    pub buckets: Buckets,
}

impl ObjectStore {
    pub fn new(sdk: &aws_config::SdkConfig, buckets: Buckets) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk),
            buckets,
        }
    }

    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        debug!("Uploading s3://{bucket}/{key} ({} bytes)", body.len());
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("failed to upload s3://{bucket}/{key}"))?;
        Ok(())
    }

    pub async fn download_url(&self, bucket: &str, key: &str) -> Result<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(DOWNLOAD_URL_EXPIRY)?)
            .await
            .with_context(|| format!("failed to presign download of s3://{bucket}/{key}"))?;
        Ok(presigned.uri().to_string())
    }

    pub async fn upload_url(&self, bucket: &str, key: &str, content_type: &str) -> Result<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .presigned(PresigningConfig::expires_in(UPLOAD_URL_EXPIRY)?)
            .await
            .with_context(|| format!("failed to presign upload of s3://{bucket}/{key}"))?;
        Ok(presigned.uri().to_string())
    }

    pub async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("failed to delete s3://{bucket}/{key}"))?;
        Ok(())
    }

    /// Deletes every object under a prefix, one at a time. There is no
    /// atomicity: a failure partway through leaves the prefix partially
    /// deleted.
    pub async fn delete_folder(&self, bucket: &str, prefix: &str) -> Result<()> {
        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };

        let listing = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(&prefix)
            .send()
            .await
            .with_context(|| format!("failed to list s3://{bucket}/{prefix}"))?;

        for object in listing.contents() {
            if let Some(key) = object.key() {
                self.delete(bucket, key).await?;
            }
        }
        Ok(())
    }

    /// A "directory" in S3 is an empty object with a trailing slash.
    pub async fn create_directory(&self, bucket: &str, path: &str) -> Result<()> {
        let key = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        self.client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .with_context(|| format!("failed to create directory s3://{bucket}/{key}"))?;
        Ok(())
    }

    /// Presigned GET for an order's preview or design in the orders bucket.
    pub async fn order_asset_url(&self, key: &str) -> Result<String> {
        self.download_url(&self.buckets.orders, key).await
    }
}
