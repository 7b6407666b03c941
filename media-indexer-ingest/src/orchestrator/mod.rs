//! Orchestrator module for the media indexer ingest.
//!
//! Routes each change event of an invocation through decode, fetch,
//! flatten and load.

mod fetcher;

pub use fetcher::BlobFetcher;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::{batch_records, decode_record, TransportRecord};
use crate::errors::IngestError;
use crate::loader::BulkIndexer;
use crate::processor::{initialization_document, Flatten, FlattenContext, Operator};
use media_indexer_shared::{fields, ChangeAction, ChangeEvent, DocumentType};

/// Payload fields read by the router.
mod payload {
    pub const S3_KEY: &str = "S3Key";
    pub const CREATED: &str = "Created";
    pub const POINTER: &str = "Pointer";
}

/// Document type written on INSERT.
const INITIALIZATION: &str = "initialization";

/// Outcome counts for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records in the batch.
    pub records: usize,
    /// Records that could not be decoded and were skipped.
    pub undecodable: usize,
}

/// Event router.
///
/// Records are handled strictly one after another, in delivery order. A
/// failure while handling one record is logged and never affects the next.
pub struct Orchestrator {
    fetcher: BlobFetcher,
    indexer: BulkIndexer,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(fetcher: BlobFetcher, indexer: BulkIndexer) -> Self {
        Self { fetcher, indexer }
    }

    /// Handle one invocation payload.
    ///
    /// Fails only when the payload carries no record list.
    #[instrument(skip_all)]
    pub async fn handle_batch(&self, event: &Value) -> Result<BatchReport, IngestError> {
        let records = batch_records(event)?;
        let mut report = BatchReport {
            records: records.len(),
            ..BatchReport::default()
        };
        info!(records = report.records, "Received batch");

        for record in records {
            if !self.handle_record(&record).await {
                report.undecodable += 1;
            }
        }

        info!(
            records = report.records,
            undecodable = report.undecodable,
            "Finished batch"
        );
        Ok(report)
    }

    /// Decode and route one record. Returns whether it could be decoded.
    async fn handle_record(&self, record: &TransportRecord<'_>) -> bool {
        match decode_record(record) {
            Ok(event) => {
                debug!(asset_id = %event.asset_id, action = %event.action, "Decoded record");
                self.handle_event(&event).await;
                true
            }
            Err(e) => {
                warn!(
                    partition_key = ?record.partition_key(),
                    sequence_number = ?record.sequence_number(),
                    error = %e,
                    "Skipping record that could not be decoded"
                );
                false
            }
        }
    }

    /// Route one decoded event by its action.
    #[instrument(skip(self, event), fields(asset_id = %event.asset_id, action = %event.action))]
    pub async fn handle_event(&self, event: &ChangeEvent) {
        match event.action {
            ChangeAction::Insert => self.handle_insert(event).await,
            ChangeAction::Modify => self.handle_modify(event).await,
            ChangeAction::Remove => self.handle_remove(event).await,
        }
    }

    /// Record the source filename and creation time of a new asset.
    async fn handle_insert(&self, event: &ChangeEvent) {
        let Some(s3_key) = required_str(event, payload::S3_KEY) else {
            return;
        };
        let Some(created) = event.get(payload::CREATED) else {
            warn!(key = payload::CREATED, "Missing required key in payload");
            return;
        };

        let document = initialization_document(s3_key, created.clone());
        self.indexer
            .bulk_write(
                &event.asset_id,
                &DocumentType::new(INITIALIZATION),
                vec![document],
            )
            .await;
    }

    /// Index the operator results the event points at.
    async fn handle_modify(&self, event: &ChangeEvent) {
        let (Some(raw_operator), Some(pointer), Some(workflow)) = (
            required_str(event, fields::OPERATOR),
            required_str(event, payload::POINTER),
            required_str(event, fields::WORKFLOW),
        ) else {
            return;
        };

        let blob = match self.fetcher.fetch(pointer).await {
            Ok(blob) => blob,
            Err(e) => {
                error!(pointer = %pointer, error = %e, "Unable to read operator results");
                return;
            }
        };

        let operator = Operator::parse(raw_operator);
        if !operator.is_supported() {
            info!(operator = %raw_operator, "Results of this operator are not stored");
            return;
        }

        let ctx = FlattenContext::new(&event.asset_id, workflow);
        let writes = match operator.flatten(&ctx, &blob) {
            Ok(writes) => writes,
            Err(e) => {
                warn!(operator = %operator, pointer = %pointer, error = %e, "Unable to flatten operator results");
                return;
            }
        };

        info!(operator = %operator, writes = writes.len(), "Indexing operator results");
        for write in writes {
            self.indexer.apply(&event.asset_id, write).await;
        }
    }

    /// Delete an asset's documents.
    ///
    /// Deleting the results of a single operator is not supported.
    async fn handle_remove(&self, event: &ChangeEvent) {
        if let Some(operator) = event.get(fields::OPERATOR) {
            info!(operator = %operator, "Selective metadata deletion is not supported, ignoring");
            return;
        }

        self.indexer.delete_asset(&event.asset_id).await;
    }
}

/// Read a required string field, logging when it is absent.
fn required_str<'a>(event: &'a ChangeEvent, key: &str) -> Option<&'a str> {
    let value = event.get_str(key);
    if value.is_none() {
        warn!(key = %key, "Missing required key in payload");
    }
    value
}
