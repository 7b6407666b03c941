//! Celebrity recognition.

use serde_json::Value;

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{as_object, empty, pages, parse_blob, require, take_items};
use media_indexer_shared::Document;

/// Flatten `Celebrities` (video) and `CelebrityFaces` (image) items.
///
/// Video items nest the match under `Celebrity`, image items under `Face`.
pub(super) fn flatten(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let items = pages(parse_blob(blob)?).into_iter().flat_map(|mut page| {
        let mut items = take_items(&mut page, "Celebrities");
        items.extend(take_items(&mut page, "CelebrityFaces"));
        items
    });

    Ok(flatten_items(ctx, operator, items, |item| {
        ctx.tag(item, operator);

        if item.contains_key("Celebrity") {
            let celebrity = as_object(require(item, "Celebrity")?, "Celebrity")?;
            let name = require(celebrity, "Name")?.clone();
            let confidence = require(celebrity, "Confidence")?.clone();
            // A body box is preferred over a face box.
            let bounding_box = celebrity
                .get("BoundingBox")
                .or_else(|| celebrity.get("Face").and_then(|face| face.get("BoundingBox")))
                .cloned()
                .unwrap_or_else(empty);
            let url = celebrity
                .get("Urls")
                .and_then(Value::as_array)
                .and_then(|urls| urls.first())
                .cloned()
                .unwrap_or_else(empty);

            item.insert("Name".to_string(), name);
            item.insert("Confidence".to_string(), confidence);
            item.insert("BoundingBox".to_string(), bounding_box);
            item.insert("URL".to_string(), url);
            item.remove("Celebrity");
        }

        if item.contains_key("Face") {
            let face = as_object(require(item, "Face")?, "Face")?;
            let confidence = require(face, "Confidence")?.clone();
            let bounding_box = require(face, "BoundingBox")?.clone();

            item.insert("Confidence".to_string(), confidence);
            item.insert("BoundingBox".to_string(), bounding_box);
            item.remove("Face");
        }

        Ok(())
    }))
}
