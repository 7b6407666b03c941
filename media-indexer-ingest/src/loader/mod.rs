//! Loader module for the media indexer ingest.
//!
//! Writes flattened documents into the search backend. Every write is best
//! effort: failures are logged with the payload that failed and never
//! propagate to the caller.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::processor::IndexWrite;
use media_indexer_repository::opensearch::{bulk_action_line, delete_asset_query, ALL_INDICES};
use media_indexer_repository::SearchBackend;
use media_indexer_shared::{fields, Document, DocumentType};

/// Default bulk payload ceiling, well below the 10 MB request cap of the
/// smallest search domain instance type.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 5_000_000;

/// Default timeout for single-document writes.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the bulk indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Upper bound on the size of one bulk request body, in bytes.
    pub max_payload_bytes: usize,
    /// Timeout applied to single-document writes.
    pub request_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Indexer that writes documents into the search backend.
///
/// The indexer is responsible for:
/// - Stamping every document with the asset it belongs to
/// - Splitting bulk writes so no request exceeds the payload ceiling
/// - Deleting everything derived from an asset
pub struct BulkIndexer {
    backend: Arc<dyn SearchBackend>,
    config: LoaderConfig,
}

impl BulkIndexer {
    /// Create a new bulk indexer with the default configuration.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::with_config(backend, LoaderConfig::default())
    }

    /// Create a new bulk indexer with custom configuration.
    pub fn with_config(backend: Arc<dyn SearchBackend>, config: LoaderConfig) -> Self {
        Self { backend, config }
    }

    /// Carry out one write produced by a flattening transform.
    pub async fn apply(&self, asset_id: &str, write: IndexWrite) {
        match write {
            IndexWrite::Bulk {
                document_type,
                documents,
            } => self.bulk_write(asset_id, &document_type, documents).await,
            IndexWrite::Single {
                document_type,
                document,
            } => self.upsert(asset_id, &document_type, document).await,
        }
    }

    /// Write `documents` through as few bulk requests as the ceiling allows.
    ///
    /// Does nothing when `documents` is empty. A single document larger than
    /// the ceiling is still sent, alone.
    #[instrument(skip(self, documents), fields(asset_id = %asset_id, document_type = %document_type, count = documents.len()))]
    pub async fn bulk_write(
        &self,
        asset_id: &str,
        document_type: &DocumentType,
        documents: Vec<Document>,
    ) {
        if documents.is_empty() {
            debug!("No documents to index, skipping bulk write");
            return;
        }

        let index = document_type.index_name();
        let action = bulk_action_line(&index).to_string();
        let mut payload = String::new();
        let mut pending = 0usize;

        for mut document in documents {
            document.insert(fields::ASSET_ID.to_string(), asset_id.into());
            let source = serde_json::Value::Object(document).to_string();

            let separator = usize::from(!payload.is_empty());
            let projected = payload.len() + separator + action.len() + 1 + source.len();
            if projected > self.config.max_payload_bytes && !payload.is_empty() {
                self.submit(asset_id, &index, std::mem::take(&mut payload), pending)
                    .await;
                pending = 0;
            }

            if !payload.is_empty() {
                payload.push('\n');
            }
            payload.push_str(&action);
            payload.push('\n');
            payload.push_str(&source);
            pending += 1;
        }

        debug!("Sending final bulk request");
        self.submit(asset_id, &index, payload, pending).await;
    }

    async fn submit(&self, asset_id: &str, index: &str, payload: String, count: usize) {
        let size = payload.len();
        debug!(index = %index, bytes = size, documents = count, "Submitting bulk payload");

        match self.backend.bulk(index, payload).await {
            Ok(summary) if summary.is_success() => {
                info!(
                    asset_id = %asset_id,
                    index = %index,
                    succeeded = summary.succeeded,
                    "Stored documents in search index"
                );
            }
            Ok(summary) => {
                warn!(
                    asset_id = %asset_id,
                    index = %index,
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    errors = ?summary.errors,
                    "Bulk request partially failed"
                );
            }
            Err(e) => {
                error!(
                    asset_id = %asset_id,
                    index = %index,
                    bytes = size,
                    documents = count,
                    error = %e,
                    "Unable to load bulk payload into search index"
                );
            }
        }
    }

    /// Index one document with the configured request timeout.
    #[instrument(skip(self, document), fields(asset_id = %asset_id, document_type = %document_type))]
    pub async fn upsert(&self, asset_id: &str, document_type: &DocumentType, mut document: Document) {
        let index = document_type.index_name();
        document.insert(fields::ASSET_ID.to_string(), asset_id.into());

        match self
            .backend
            .index(&index, &document, self.config.request_timeout)
            .await
        {
            Ok(()) => info!(index = %index, "Stored document in search index"),
            Err(e) => {
                error!(
                    index = %index,
                    error = %e,
                    document = %serde_json::Value::Object(document),
                    "Unable to load document into search index"
                );
            }
        }
    }

    /// Delete every document derived from `asset_id`, across all indices.
    #[instrument(skip(self))]
    pub async fn delete_asset(&self, asset_id: &str) {
        let query = delete_asset_query(asset_id);

        match self.backend.delete_by_query(ALL_INDICES, &query).await {
            Ok(deleted) => info!(deleted = deleted, "Deleted asset from search index"),
            Err(e) => error!(error = %e, "Unable to delete asset from search index"),
        }
    }
}
