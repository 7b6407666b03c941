//! Technical cue and shot segments.

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{pages, parse_blob, rename, require_in, take_items};
use media_indexer_shared::Document;

/// Which segment detection produced the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SegmentKind {
    TechnicalCue,
    Shot,
}

impl SegmentKind {
    /// Key of the nested segment object.
    fn segment_key(self) -> &'static str {
        match self {
            SegmentKind::TechnicalCue => "TechnicalCueSegment",
            SegmentKind::Shot => "ShotSegment",
        }
    }

    /// Field that, together with `Confidence`, is hoisted from the segment.
    fn detail_key(self) -> &'static str {
        match self {
            SegmentKind::TechnicalCue => "Type",
            SegmentKind::Shot => "Index",
        }
    }
}

pub(super) fn flatten(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
    kind: SegmentKind,
) -> Result<Vec<Document>, FlattenError> {
    let items = pages(parse_blob(blob)?)
        .into_iter()
        .flat_map(|mut page| take_items(&mut page, "Segments"));

    Ok(flatten_items(ctx, operator, items, |item| {
        ctx.tag(item, operator);
        let Some(segment) = item.get(kind.segment_key()) else {
            return Ok(());
        };

        let confidence = require_in(segment, "Confidence")?.clone();
        let detail = require_in(segment, kind.detail_key())?.clone();

        item.insert("Confidence".to_string(), confidence);
        item.insert(kind.detail_key().to_string(), detail);
        item.remove(kind.segment_key());
        rename(item, "StartTimestampMillis", "StartTimestamp")?;
        rename(item, "EndTimestampMillis", "EndTimestamp")?;
        Ok(())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> FlattenContext<'static> {
        FlattenContext::new("asset-1", "workflow-1")
    }

    #[test]
    fn test_technical_cues() {
        let blob = json!({
            "Segments": [{
                "Type": "TECHNICAL_CUE",
                "StartTimestampMillis": 0,
                "EndTimestampMillis": 4000,
                "DurationMillis": 4000,
                "TechnicalCueSegment": {"Type": "BlackFrames", "Confidence": 99.2}
            }]
        });

        let docs = flatten(&ctx(), "technical_cue_detection", &blob.to_string(), SegmentKind::TechnicalCue)
            .unwrap();

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc["Type"], "BlackFrames");
        assert_eq!(doc["Confidence"], 99.2);
        assert_eq!(doc["StartTimestamp"], 0);
        assert_eq!(doc["EndTimestamp"], 4000);
        assert!(!doc.contains_key("StartTimestampMillis"));
        assert!(!doc.contains_key("TechnicalCueSegment"));
        assert_eq!(doc["Operator"], "technical_cue_detection");
    }

    #[test]
    fn test_shots() {
        let blob = json!([
            {"Segments": [{"StartTimestampMillis": 0, "EndTimestampMillis": 10, "ShotSegment": {"Index": 0, "Confidence": 90.0}}]},
            {"Segments": [{"StartTimestampMillis": 10, "EndTimestampMillis": 20, "ShotSegment": {"Index": 1, "Confidence": 91.0}}]}
        ]);

        let docs = flatten(&ctx(), "shot_detection", &blob.to_string(), SegmentKind::Shot).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["Index"], 1);
        assert_eq!(docs[1]["StartTimestamp"], 10);
        assert!(!docs[1].contains_key("ShotSegment"));
    }

    #[test]
    fn test_segment_without_timestamps_is_dropped() {
        let blob = json!({
            "Segments": [
                {"ShotSegment": {"Index": 0, "Confidence": 90.0}},
                {"StartTimestampMillis": 5, "EndTimestampMillis": 6, "ShotSegment": {"Index": 1, "Confidence": 90.0}}
            ]
        });

        let docs = flatten(&ctx(), "shot_detection", &blob.to_string(), SegmentKind::Shot).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["Index"], 1);
    }
}
