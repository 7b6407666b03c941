//! Whole-result documents.

use serde_json::Value;

use super::FlattenContext;
use crate::errors::FlattenError;
use crate::processor::values::{into_object, parse_blob};
use media_indexer_shared::{fields, Document};

/// Translation results are indexed as one document.
///
/// The workflow is stored under a lowercase `workflow` key, unlike item
/// documents.
pub(super) fn flatten_translation(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Document, FlattenError> {
    let mut translation = into_object(parse_blob(blob)?, "translation")?;
    translation.insert("workflow".to_string(), Value::from(ctx.workflow));
    translation.insert(fields::OPERATOR.to_string(), Value::from(operator));
    Ok(translation)
}

/// Captions for one language are indexed as one document.
pub(super) fn flatten_webcaptions(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Document, FlattenError> {
    let mut captions = into_object(parse_blob(blob)?, "webcaptions")?;
    ctx.tag(&mut captions, operator);
    Ok(captions)
}

/// Document recording an asset's source file and creation time.
pub fn initialization_document(s3_key: &str, created: Value) -> Document {
    let filename = s3_key.rsplit('/').next().unwrap_or(s3_key);

    let mut document = Document::new();
    document.insert("filename".to_string(), Value::from(filename));
    document.insert("created".to_string(), created);
    document
}
