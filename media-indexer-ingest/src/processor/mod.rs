//! Processor module for the media indexer ingest.
//!
//! Resolves operator names and flattens operator results into search
//! documents.

mod operator;
mod transforms;
mod values;

pub use operator::{normalize_operator, MediaType, NormalizedOperator, Operator};
pub use transforms::{initialization_document, Flatten, FlattenContext, IndexWrite};
