//! # Media Indexer
//!
//! Lambda entry point for the media indexer.
//!
//! This crate provides the configuration, logging setup and dependency
//! wiring for running the ingest orchestrator inside AWS Lambda.

pub mod config;
pub mod telemetry;

pub use config::{Dependencies, IndexerConfig};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] media_indexer_ingest::IngestError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] media_indexer_repository::SearchError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
