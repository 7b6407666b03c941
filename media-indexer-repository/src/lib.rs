//! # Media Indexer Repository
//!
//! This crate provides the traits the indexer uses to talk to its external
//! collaborators, the search backend and the object store, together with
//! concrete implementations for OpenSearch and S3.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod s3;
pub mod types;

pub use config::{load_sdk_config, ClientTuning};
pub use errors::{ObjectStoreError, SearchError};
pub use interfaces::{ObjectStore, SearchBackend};
pub use opensearch::OpenSearchBackend;
pub use s3::S3ObjectStore;
pub use types::BatchOperationSummary;
