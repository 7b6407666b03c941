//! OpenSearch implementation of the search backend.
//!
//! This module provides a concrete implementation of `SearchBackend`
//! using OpenSearch as the backend.

mod client;
mod queries;

pub use client::{endpoint_url, OpenSearchBackend};
pub use queries::{bulk_action_line, delete_asset_query, ALL_INDICES};
