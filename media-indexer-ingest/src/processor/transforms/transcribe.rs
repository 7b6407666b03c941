//! Speech transcription.

use serde_json::Value;

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{
    into_object, millis_string, parse_blob, percent_string, require_in, take, take_items,
};
use media_indexer_shared::{fields, Document};

/// Split a transcription into the full transcript and its timed items.
///
/// The transcript carries the workflow under a lowercase `workflow` key.
/// Items get their first alternative hoisted, a percent confidence and
/// millisecond timings. Punctuation items have no timings and keep none.
pub(super) fn flatten(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<(Document, Vec<Document>), FlattenError> {
    let mut transcription = into_object(parse_blob(blob)?, "transcription")?;
    let mut results = take(&mut transcription, "results")?;

    let transcript = take_items(&mut results, "transcripts")
        .into_iter()
        .next()
        .ok_or_else(|| FlattenError::missing("transcripts"))?;
    let mut transcript = into_object(transcript, "transcripts")?;
    transcript.insert("workflow".to_string(), Value::from(ctx.workflow));
    transcript.insert(fields::OPERATOR.to_string(), Value::from(operator));

    if results.get("items").is_none() {
        return Err(FlattenError::missing("items"));
    }
    let items = take_items(&mut results, "items");

    let items = flatten_items(ctx, operator, items, |item| {
        let alternative = item
            .get("alternatives")
            .and_then(|alternatives| alternatives.get(0))
            .ok_or_else(|| FlattenError::missing("alternatives"))?;
        let content = require_in(alternative, "content")?.clone();
        let confidence = percent_string(require_in(alternative, "confidence")?, "confidence")?;

        let timings = match (item.get("start_time"), item.get("end_time")) {
            (Some(start), Some(end)) => Some((
                millis_string(start, "start_time")?,
                millis_string(end, "end_time")?,
            )),
            _ => None,
        };
        if let Some((start, end)) = timings {
            item.insert("start_time".to_string(), Value::String(start));
            item.insert("end_time".to_string(), Value::String(end));
        }

        item.remove("alternatives");
        item.insert("confidence".to_string(), Value::String(confidence));
        item.insert("content".to_string(), content);
        ctx.tag(item, operator);
        Ok(())
    });

    Ok((transcript, items))
}
