//! Media container metadata.

use serde_json::Value;

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{parse_blob, take_items};
use media_indexer_shared::Document;

/// One document per track.
///
/// Nested arrays of objects index poorly, so `tracks` is flattened into
/// sibling documents.
pub(super) fn flatten(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let mut metadata = parse_blob(blob)?;
    if !matches!(metadata, Value::Object(_)) {
        return Err(FlattenError::unexpected_type("mediainfo", "an object"));
    }
    if metadata.get("tracks").is_none() {
        return Err(FlattenError::missing("tracks"));
    }
    let tracks = take_items(&mut metadata, "tracks");

    Ok(flatten_items(ctx, operator, tracks, |item| {
        ctx.tag(item, operator);
        Ok(())
    }))
}
