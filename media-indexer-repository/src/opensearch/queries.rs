//! OpenSearch request bodies.
//!
//! This module provides the JSON bodies the indexer sends: bulk action
//! lines and the delete-by-asset query.

use serde_json::{json, Value};

use media_indexer_shared::fields;

/// Index pattern addressing every index on the cluster.
pub const ALL_INDICES: &str = "_all";

/// Build the action line preceding a document in a bulk payload.
///
/// No `_type` is sent; OpenSearch 2.x no longer accepts mapping types.
pub fn bulk_action_line(index: &str) -> Value {
    json!({ "index": { "_index": index } })
}

/// Build a query matching every document derived from `asset_id`.
pub fn delete_asset_query(asset_id: &str) -> Value {
    json!({
        "query": {
            "match": {
                (fields::ASSET_ID): asset_id
            }
        }
    })
}
