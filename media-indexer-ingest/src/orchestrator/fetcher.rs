//! Blob fetcher.

use std::sync::Arc;
use tracing::debug;

use media_indexer_repository::{ObjectStore, ObjectStoreError};

/// Reads operator result blobs by the pointer carried in a change event.
#[derive(Clone)]
pub struct BlobFetcher {
    store: Arc<dyn ObjectStore>,
}

impl BlobFetcher {
    /// Create a fetcher reading from `store`.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Fetch the blob at `pointer` as UTF-8 JSON text.
    pub async fn fetch(&self, pointer: &str) -> Result<String, ObjectStoreError> {
        let blob = self.store.get_object(pointer).await?;
        debug!(pointer = %pointer, bytes = blob.len(), "Fetched operator results");
        Ok(blob)
    }
}
