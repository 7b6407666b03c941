//! Flat search documents and the indices they are written to.

use std::fmt;

use serde_json::{Map, Value};

/// A single-level search document.
///
/// Values are kept as raw JSON so that operator-specific fields pass through
/// untouched; only the well-known fields in [`fields`] are guaranteed.
pub type Document = Map<String, Value>;

/// Field names every indexed document carries.
pub mod fields {
    /// The asset the document was derived from.
    pub const ASSET_ID: &str = "AssetId";
    /// Canonical operator tag.
    pub const OPERATOR: &str = "Operator";
    /// Workflow execution that produced the operator result.
    pub const WORKFLOW: &str = "Workflow";
}

/// Prefix shared by every index this system writes to.
const INDEX_PREFIX: &str = "mie";

/// Logical document type, e.g. `labels` or `videotranscript`.
///
/// Several operators may share one document type; the backing index name is
/// always derived through [`DocumentType::index_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentType(String);

impl DocumentType {
    /// Create a document type from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the search index holding documents of this type.
    ///
    /// ```
    /// use media_indexer_shared::DocumentType;
    ///
    /// assert_eq!(DocumentType::new("textDetection").index_name(), "mietextdetection");
    /// ```
    pub fn index_name(&self) -> String {
        format!("{}{}", INDEX_PREFIX, self.0).to_lowercase()
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
