//! # Media Indexer Shared
//!
//! Types shared between the media indexer crates: the flat search document,
//! the decoded change event and the document-type to index-name convention.

mod document;
mod event;

pub use document::{fields, Document, DocumentType};
pub use event::{ChangeAction, ChangeEvent};
