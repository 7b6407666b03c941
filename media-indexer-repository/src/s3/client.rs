//! S3-backed object store.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, info, instrument};

use crate::errors::ObjectStoreError;
use crate::interfaces::ObjectStore;

/// Reads operator results from the dataplane bucket.
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a store reading from `bucket`.
    pub fn new(sdk_config: &SdkConfig, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let client = S3Client::new(sdk_config);

        info!(bucket = %bucket, "S3 object store initialized");

        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn get_object(&self, key: &str) -> Result<String, ObjectStoreError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                ObjectStoreError::request(&self.bucket, key, DisplayErrorContext(&e).to_string())
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::body(key, e.to_string()))?
            .into_bytes();

        debug!(bytes = bytes.len(), "Fetched object");

        String::from_utf8(bytes.to_vec()).map_err(|_| ObjectStoreError::encoding(key))
    }
}
