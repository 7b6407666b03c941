//! Response types for search backend operations.

use serde_json::Value;

/// Summary of a bulk submission as reported by the backend.
///
/// The backend answers a bulk request with one result per action; a request
/// can succeed as a whole while individual items are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOperationSummary {
    /// Total number of actions in the submission.
    pub total: usize,
    /// Number of actions the backend accepted.
    pub succeeded: usize,
    /// Number of actions the backend rejected.
    pub failed: usize,
    /// Error reasons for rejected actions, in submission order.
    pub errors: Vec<String>,
}

impl BatchOperationSummary {
    /// Build a summary from a bulk response body.
    ///
    /// Items without an `error` object count as succeeded.
    pub fn from_bulk_response(body: &Value) -> Self {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let errors: Vec<String> = items
            .iter()
            .filter_map(|item| {
                item.as_object()
                    .and_then(|actions| actions.values().next())
                    .and_then(|result| result.get("error"))
            })
            .map(|error| {
                error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string())
            })
            .collect();

        Self {
            total: items.len(),
            succeeded: items.len() - errors.len(),
            failed: errors.len(),
            errors,
        }
    }

    /// Whether every action was accepted.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
