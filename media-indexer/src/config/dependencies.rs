//! Dependency initialization and wiring for the media indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::IndexerConfig;
use crate::IndexingError;
use media_indexer_ingest::{BlobFetcher, BulkIndexer, Orchestrator};
use media_indexer_repository::{load_sdk_config, OpenSearchBackend, S3ObjectStore};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to handle batches.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from `config`.
    ///
    /// Loads the shared AWS SDK configuration once and builds the object
    /// store and the signed search backend from it.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the search endpoint is unusable
    pub async fn init(config: IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            es_endpoint = %config.es_endpoint,
            dataplane_bucket = %config.dataplane_bucket,
            max_payload_bytes = config.loader.max_payload_bytes,
            "Initializing dependencies"
        );

        let sdk_config = load_sdk_config(&config.client_tuning).await;

        // Initialize the object store
        let store = S3ObjectStore::new(&sdk_config, config.dataplane_bucket);

        // Initialize the search backend
        let backend = OpenSearchBackend::new(&config.es_endpoint, &sdk_config)?;
        info!("Search backend client created");

        let orchestrator = Orchestrator::new(
            BlobFetcher::new(Arc::new(store)),
            BulkIndexer::with_config(Arc::new(backend), config.loader),
        );

        Ok(Self { orchestrator })
    }

    /// Log shutdown of the dependencies.
    ///
    /// The clients hold no buffered state, so nothing needs flushing; the
    /// connections close when the process exits.
    pub fn shutdown(&self) {
        info!("Shutting down dependencies");
    }
}
