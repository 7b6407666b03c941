//! # Media Indexer Ingest
//!
//! This crate turns change events describing media-analysis results into flat
//! search documents and writes them into the search backend.
//!
//! ## Architecture
//!
//! The ingest follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Decodes transport records into change events
//! 2. **Processor**: Normalizes operator names and flattens operator results
//! 3. **Loader**: Writes documents in size-bounded bulk submissions
//! 4. **Orchestrator**: Routes each event through fetch, flatten and load

pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use errors::{DecodeError, FlattenError, IngestError};
pub use loader::{BulkIndexer, LoaderConfig};
pub use orchestrator::{BatchReport, BlobFetcher, Orchestrator};
