//! Search error types.
//!
//! This module defines the error types that can occur while talking to the search backend.

use thiserror::Error;

/// Errors that can occur during search backend operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Failed to set up the connection to the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to index a single document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// A bulk submission was rejected or could not be sent.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Delete-by-query failed.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Failed to parse a response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
