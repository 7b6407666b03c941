//! Consumer module for the media indexer ingest.
//!
//! Reads the record batch an invocation receives and decodes each record
//! into a change event.

mod decoder;
mod messages;

pub use decoder::decode_record;
pub use messages::{batch_records, TransportRecord};
