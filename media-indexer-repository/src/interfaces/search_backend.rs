//! Search backend trait definition.
//!
//! This module defines the abstract interface for writing into the search
//! backend, allowing for different implementations (OpenSearch, mock, etc.).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::BatchOperationSummary;
use media_indexer_shared::Document;

/// Abstract interface for search backend write operations.
///
/// The indexer never reads from the backend; it only submits documents and
/// removes them again when an asset is deleted.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>`. Callers decide whether a
/// failure is fatal; the indexer logs and moves on.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Submit a pre-built newline-delimited bulk payload.
    ///
    /// # Arguments
    ///
    /// * `index` - Default index for the request
    /// * `payload` - Action/document line pairs joined with `\n`
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-item outcome counts reported by the backend
    /// * `Err(SearchError)` - If the request could not be sent or was rejected outright
    async fn bulk(&self, index: &str, payload: String)
        -> Result<BatchOperationSummary, SearchError>;

    /// Index a single document, letting the backend assign its id.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index name
    /// * `document` - The document body
    /// * `timeout` - Upper bound on the request duration
    async fn index(
        &self,
        index: &str,
        document: &Document,
        timeout: Duration,
    ) -> Result<(), SearchError>;

    /// Delete every document matching `query` in `index`.
    ///
    /// `index` may be `_all`.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of documents the backend reports as deleted
    /// * `Err(SearchError)` - If the deletion fails
    async fn delete_by_query(&self, index: &str, query: &Value) -> Result<u64, SearchError>;
}
