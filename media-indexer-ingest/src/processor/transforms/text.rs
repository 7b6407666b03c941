//! Text detection.

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{as_object, into_object, pages, parse_blob, require, require_in, take, take_items};
use media_indexer_shared::Document;

/// Video results wrap each detection together with its timestamp; image
/// results are the detection itself.
pub(super) fn flatten(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let items = pages(parse_blob(blob)?)
        .into_iter()
        .flat_map(|mut page| take_items(&mut page, "TextDetections"));

    Ok(flatten_items(ctx, operator, items, |item| {
        if item.contains_key("TextDetection") {
            let detection = as_object(require(item, "TextDetection")?, "TextDetection")?;
            let timestamp = require(item, "Timestamp")?.clone();
            let bounding_box = require_in(require(detection, "Geometry")?, "BoundingBox")?.clone();

            let mut detection = into_object(take(item, "TextDetection")?, "TextDetection")?;
            detection.remove("Geometry");
            detection.insert("Timestamp".to_string(), timestamp);
            detection.insert("BoundingBox".to_string(), bounding_box);
            *item = detection;
        }
        ctx.tag(item, operator);
        Ok(())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn ctx() -> FlattenContext<'static> {
        FlattenContext::new("asset-1", "workflow-1")
    }

    #[test]
    fn test_video_schema_is_hoisted() {
        let blob = json!({
            "TextDetections": [{
                "Timestamp": 1001,
                "TextDetection": {
                    "DetectedText": "EXIT",
                    "Type": "LINE",
                    "Confidence": 98.1,
                    "Geometry": {
                        "BoundingBox": {"Width": 0.1, "Height": 0.05, "Left": 0.4, "Top": 0.2},
                        "Polygon": [{"X": 0.4, "Y": 0.2}]
                    }
                }
            }]
        });

        let docs = flatten(&ctx(), "textDetection", &blob.to_string()).unwrap();

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc["DetectedText"], "EXIT");
        assert_eq!(doc["Timestamp"], 1001);
        assert_eq!(doc["BoundingBox"]["Left"], 0.4);
        assert!(!doc.contains_key("Geometry"));
        assert!(!doc.contains_key("TextDetection"));
        assert_eq!(doc["Operator"], "textDetection");
        assert_eq!(doc["Workflow"], "workflow-1");
    }

    #[test]
    fn test_image_schema_is_kept() {
        let blob = json!({
            "TextDetections": [{
                "DetectedText": "STOP",
                "Id": 0,
                "Geometry": {"BoundingBox": {"Width": 0.3}}
            }]
        });

        let docs = flatten(&ctx(), "textDetection", &blob.to_string()).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["DetectedText"], "STOP");
        assert!(docs[0].contains_key("Geometry"));
        assert_eq!(docs[0]["Operator"], "textDetection");
    }

    #[test]
    fn test_paged_results_and_bad_items() {
        let blob = json!([
            {"TextDetections": [
                {"TextDetection": {"DetectedText": "A", "Geometry": {"BoundingBox": {}}}},
                {"Timestamp": 5, "TextDetection": {"DetectedText": "B", "Geometry": {"BoundingBox": {}}}}
            ]},
            {"TextDetections": [
                {"Timestamp": 9, "TextDetection": {"DetectedText": "C", "Geometry": {"BoundingBox": {}}}}
            ]}
        ]);

        let docs = flatten(&ctx(), "textDetection", &blob.to_string()).unwrap();

        let texts: Vec<&Value> = docs.iter().map(|d| &d["DetectedText"]).collect();
        assert_eq!(texts, vec!["B", "C"]);
    }

    #[test]
    fn test_invalid_blob() {
        assert!(matches!(
            flatten(&ctx(), "textDetection", "{"),
            Err(FlattenError::InvalidJson(_))
        ));
    }
}
