//! Content moderation.

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{as_object, empty, pages, parse_blob, require, take_items};
use media_indexer_shared::Document;

pub(super) fn flatten(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let items = pages(parse_blob(blob)?)
        .into_iter()
        .flat_map(|mut page| take_items(&mut page, "ModerationLabels"));

    Ok(flatten_items(ctx, operator, items, |item| {
        ctx.tag(item, operator);

        if item.contains_key("ModerationLabel") {
            let label = as_object(require(item, "ModerationLabel")?, "ModerationLabel")?;
            let name = require(label, "Name")?.clone();
            let parent_name = label.get("ParentName").cloned().unwrap_or_else(empty);
            let confidence = label.get("Confidence").cloned().unwrap_or_else(empty);

            item.insert("Name".to_string(), name);
            item.insert("ParentName".to_string(), parent_name);
            item.insert("Confidence".to_string(), confidence);
            item.remove("ModerationLabel");
        }

        Ok(())
    }))
}
