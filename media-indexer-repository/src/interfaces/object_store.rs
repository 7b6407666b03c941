//! Object store trait definition.

use async_trait::async_trait;

use crate::errors::ObjectStoreError;

/// Read access to the bucket holding operator results.
///
/// The bucket is fixed per deployment, so callers only pass the key (the
/// `Pointer` carried by a change event).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object at `key` and return its body as UTF-8 text.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The object body
    /// * `Err(ObjectStoreError)` - If the object cannot be read
    async fn get_object(&self, key: &str) -> Result<String, ObjectStoreError>;
}
