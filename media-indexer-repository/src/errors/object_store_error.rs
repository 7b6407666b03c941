//! Object store error types.

use thiserror::Error;

/// Errors that can occur while reading an operator result from the object store.
#[derive(Debug, Clone, Error)]
pub enum ObjectStoreError {
    /// The get request itself failed (missing key, access denied, network).
    #[error("Failed to get s3://{bucket}/{key}: {message}")]
    RequestError {
        bucket: String,
        key: String,
        message: String,
    },

    /// The object body could not be read to the end.
    #[error("Failed to read body of {key}: {message}")]
    BodyError { key: String, message: String },

    /// The object body is not valid UTF-8.
    #[error("Object {key} is not valid UTF-8")]
    EncodingError { key: String },
}

impl ObjectStoreError {
    /// Create a request error.
    pub fn request(bucket: &str, key: &str, msg: impl Into<String>) -> Self {
        Self::RequestError {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: msg.into(),
        }
    }

    /// Create a body read error.
    pub fn body(key: &str, msg: impl Into<String>) -> Self {
        Self::BodyError {
            key: key.to_string(),
            message: msg.into(),
        }
    }

    /// Create an encoding error.
    pub fn encoding(key: &str) -> Self {
        Self::EncodingError {
            key: key.to_string(),
        }
    }
}
