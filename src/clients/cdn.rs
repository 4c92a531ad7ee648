//! CloudFront cache invalidation.

use anyhow::{Context, Result};
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use uuid::Uuid;

#[derive(Clone)]
pub struct CdnClient {
    client: aws_sdk_cloudfront::Client,
    distribution_id: String,
}

impl CdnClient {
    pub fn new(sdk: &aws_config::SdkConfig, distribution_id: String) -> Self {
        Self {
            client: aws_sdk_cloudfront::Client::new(sdk),
            distribution_id,
        }
    }

    pub async fn invalidate(&self, path: &str) -> Result<()> {
        let paths = Paths::builder().quantity(1).items(path).build()?;
        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(Uuid::new_v4().to_string())
            .build()?;

        self.client
            .create_invalidation()
            .distribution_id(&self.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .with_context(|| format!("failed to invalidate CloudFront path {path}"))?;
        Ok(())
    }
}
