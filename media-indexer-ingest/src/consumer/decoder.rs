//! Payload decoder.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use crate::consumer::messages::TransportRecord;
use crate::errors::DecodeError;
use media_indexer_shared::{ChangeAction, ChangeEvent};

/// Payload field naming the action.
const ACTION_FIELD: &str = "Action";

/// Decode a transport record into a change event.
///
/// The partition key becomes the asset id; the data is base64 over UTF-8
/// JSON and must be an object carrying a known `Action`.
pub fn decode_record(record: &TransportRecord<'_>) -> Result<ChangeEvent, DecodeError> {
    let asset_id = record
        .partition_key()
        .ok_or(DecodeError::MissingPartitionKey)?;
    let data = record.data().ok_or(DecodeError::MissingData)?;

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let payload = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(payload)) => payload,
        Ok(_) => return Err(DecodeError::NotAnObject),
        Err(e) => return Err(DecodeError::Json(e.to_string())),
    };

    let action = match payload.get(ACTION_FIELD) {
        None | Some(Value::Null) => return Err(DecodeError::MissingAction),
        Some(Value::String(action)) => action
            .parse::<ChangeAction>()
            .map_err(DecodeError::UnknownAction)?,
        Some(other) => return Err(DecodeError::UnknownAction(other.to_string())),
    };

    Ok(ChangeEvent::new(action, asset_id, payload))
}
