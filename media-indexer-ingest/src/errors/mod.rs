//! Error types for the media indexer ingest.

use thiserror::Error;

/// Fatal errors for a whole invocation.
///
/// Everything that goes wrong with an individual record is logged and
/// absorbed; only a batch whose structure cannot be read at all surfaces here.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The invocation payload is not a record batch.
    #[error("Malformed batch: {0}")]
    MalformedBatch(String),
}

impl IngestError {
    /// Create a malformed batch error.
    pub fn malformed_batch(msg: impl Into<String>) -> Self {
        Self::MalformedBatch(msg.into())
    }
}

/// Errors decoding a single transport record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The record has no partition key.
    #[error("Record has no partition key")]
    MissingPartitionKey,

    /// The record has no data field.
    #[error("Record has no data")]
    MissingData,

    /// The data field is not valid base64.
    #[error("Invalid base64 data: {0}")]
    Base64(String),

    /// The decoded data is not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    Json(String),

    /// The decoded payload is valid JSON but not an object.
    #[error("Payload is not a JSON object")]
    NotAnObject,

    /// The payload carries no `Action`.
    #[error("Payload has no Action")]
    MissingAction,

    /// The payload carries an action this consumer does not handle.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Errors flattening an operator result.
///
/// At item granularity these drop the single offending item; for a whole
/// blob they turn the event into a logged no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// The blob is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A required field is absent.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A field is present but has the wrong shape.
    #[error("Field {field} is not {expected}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
    },
}

impl FlattenError {
    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an unexpected type error.
    pub fn unexpected_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedType {
            field: field.into(),
            expected,
        }
    }
}

impl From<serde_json::Error> for FlattenError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}
