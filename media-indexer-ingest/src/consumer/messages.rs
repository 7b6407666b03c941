//! Transport record access.
//!
//! An invocation receives `{"Records": [...]}` where each record wraps the
//! stream message as `{"kinesis": {"partitionKey": .., "data": <base64>}}`.
//! Records are read field by field rather than deserialized as a whole so
//! that one broken record never poisons its siblings.

use serde_json::Value;

use crate::errors::IngestError;

/// Name of the array holding the records of a batch.
const RECORDS_FIELD: &str = "Records";

/// A borrowed view of one stream record.
#[derive(Debug, Clone, Copy)]
pub struct TransportRecord<'a> {
    raw: &'a Value,
}

impl<'a> TransportRecord<'a> {
    /// Wrap a raw record.
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    fn stream_field(&self, key: &str) -> Option<&'a str> {
        self.raw
            .get("kinesis")
            .and_then(|kinesis| kinesis.get(key))
            .and_then(Value::as_str)
    }

    /// The partition key, which carries the asset id.
    pub fn partition_key(&self) -> Option<&'a str> {
        self.stream_field("partitionKey")
    }

    /// The base64-encoded message body.
    pub fn data(&self) -> Option<&'a str> {
        self.stream_field("data")
    }

    /// Sequence number, used only for logging.
    pub fn sequence_number(&self) -> Option<&'a str> {
        self.stream_field("sequenceNumber")
    }
}

/// Extract the record list from an invocation payload.
///
/// A payload without a `Records` array is the one failure that is not
/// absorbed per record.
pub fn batch_records(event: &Value) -> Result<Vec<TransportRecord<'_>>, IngestError> {
    let records = event
        .get(RECORDS_FIELD)
        .ok_or_else(|| IngestError::malformed_batch("event has no Records"))?
        .as_array()
        .ok_or_else(|| IngestError::malformed_batch("Records is not a list"))?;

    Ok(records.iter().map(TransportRecord::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_records() {
        let event = json!({
            "Records": [
                {"kinesis": {"partitionKey": "asset-1", "data": "e30=", "sequenceNumber": "1"}},
                {"kinesis": {}}
            ]
        });

        let records = batch_records(&event).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].partition_key(), Some("asset-1"));
        assert_eq!(records[0].data(), Some("e30="));
        assert_eq!(records[0].sequence_number(), Some("1"));
        assert_eq!(records[1].partition_key(), None);
        assert_eq!(records[1].data(), None);
    }

    #[test]
    fn test_batch_without_records_is_fatal() {
        assert!(matches!(
            batch_records(&Value::Null),
            Err(IngestError::MalformedBatch(_))
        ));
        assert!(matches!(
            batch_records(&json!({"Records": {"kinesis": {}}})),
            Err(IngestError::MalformedBatch(_))
        ));
    }

    #[test]
    fn test_empty_batch() {
        let event = json!({"Records": []});
        let records = batch_records(&event).unwrap();
        assert!(records.is_empty());
    }
}
