//! Interface definitions for the indexer's external collaborators.
//!
//! This module defines the abstract `SearchBackend` and `ObjectStore` traits
//! that allow for dependency injection and swappable implementations.

mod object_store;
mod search_backend;

pub use object_store::ObjectStore;
pub use search_backend::SearchBackend;
