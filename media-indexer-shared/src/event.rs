//! Change events delivered by the upstream dataplane stream.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::document::Document;

/// What happened to the asset record upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    /// A new asset was registered.
    Insert,
    /// An operator result was attached to the asset.
    Modify,
    /// The asset (or part of its metadata) was removed.
    Remove,
}

impl ChangeAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Insert => "INSERT",
            ChangeAction::Modify => "MODIFY",
            ChangeAction::Remove => "REMOVE",
        }
    }
}

impl FromStr for ChangeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(ChangeAction::Insert),
            "MODIFY" => Ok(ChangeAction::Modify),
            "REMOVE" => Ok(ChangeAction::Remove),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded change event.
///
/// Constructed per transport record and discarded once processed.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// The action to apply.
    pub action: ChangeAction,
    /// Partition key of the record, the asset identifier.
    pub asset_id: String,
    /// The full decoded payload, including the `Action` field.
    pub payload: Document,
}

impl ChangeEvent {
    /// Create a new change event.
    pub fn new(action: ChangeAction, asset_id: impl Into<String>, payload: Document) -> Self {
        Self {
            action,
            asset_id: asset_id.into(),
            payload,
        }
    }

    /// Raw payload value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Payload value for `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}
