//! Face search and face detection.

use serde_json::Value;

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{as_object, pages, parse_blob, require, require_in, take_items};
use media_indexer_shared::Document;

/// Attributes hoisted out of a detected video face, in output order.
const FACE_ATTRIBUTES: [&str; 12] = [
    "BoundingBox",
    "AgeRange",
    "Smile",
    "Eyeglasses",
    "Sunglasses",
    "Gender",
    "Beard",
    "Mustache",
    "EyesOpen",
    "MouthOpen",
    "Emotions",
    "Confidence",
];

/// Flatten tracked persons and their matches against a face collection.
pub(super) fn flatten_search(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let items = pages(parse_blob(blob)?)
        .into_iter()
        .flat_map(|mut page| take_items(&mut page, "Persons"));

    Ok(flatten_items(ctx, operator, items, |item| {
        ctx.tag(item, operator);

        let person = as_object(require(item, "Person")?, "Person")?;
        let mut hoisted = Document::new();
        hoisted.insert("PersonIndex".to_string(), require(person, "Index")?.clone());
        if let Some(bounding_box) = person.get("BoundingBox") {
            hoisted.insert("PersonBoundingBox".to_string(), bounding_box.clone());
        }
        if let Some(face) = person.get("Face") {
            for (from, to) in [
                ("BoundingBox", "FaceBoundingBox"),
                ("Landmarks", "FaceLandmarks"),
                ("Pose", "FacePose"),
                ("Quality", "FaceQuality"),
                ("Confidence", "Confidence"),
            ] {
                hoisted.insert(to.to_string(), require_in(face, from)?.clone());
            }
        }

        match item.get("FaceMatches") {
            Some(matches) => {
                hoisted.insert("ContainsKnownFace".to_string(), Value::Bool(true));
                // Later matches overwrite earlier ones.
                for face_match in matches.as_array().into_iter().flatten() {
                    let face = require_in(face_match, "Face")?;
                    for (field, value) in [
                        ("KnownFaceSimilarity", require_in(face_match, "Similarity")?),
                        ("MatchingKnownFaceId", require_in(face, "FaceId")?),
                        ("KnownFaceBoundingBox", require_in(face, "BoundingBox")?),
                        ("ImageId", require_in(face, "ImageId")?),
                    ] {
                        hoisted.insert(field.to_string(), value.clone());
                    }
                }
            }
            None => {
                hoisted.insert("ContainsKnownFace".to_string(), Value::Bool(false));
            }
        }

        item.remove("FaceMatches");
        item.remove("Person");
        item.extend(hoisted);
        Ok(())
    }))
}

/// Flatten video `Faces` and image `FaceDetails`.
pub(super) fn flatten_detection(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let mut documents = Vec::new();

    for mut page in pages(parse_blob(blob)?) {
        let faces = take_items(&mut page, "Faces");
        documents.extend(flatten_items(ctx, operator, faces, |item| {
            ctx.tag(item, operator);
            if let Some(face) = item.get("Face") {
                let hoisted = FACE_ATTRIBUTES
                    .iter()
                    .map(|attribute| -> Result<(String, Value), FlattenError> {
                        Ok((attribute.to_string(), require_in(face, attribute)?.clone()))
                    })
                    .collect::<Result<Document, _>>()?;
                item.remove("Face");
                item.extend(hoisted);
            }
            Ok(())
        }));

        let details = take_items(&mut page, "FaceDetails");
        documents.extend(flatten_items(ctx, operator, details, |item| {
            ctx.tag(item, operator);
            Ok(())
        }));
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> FlattenContext<'static> {
        FlattenContext::new("asset-1", "workflow-1")
    }

    fn person_face() -> Value {
        json!({
            "BoundingBox": {"Left": 0.1},
            "Landmarks": [{"Type": "eyeLeft"}],
            "Pose": {"Roll": 1.0},
            "Quality": {"Sharpness": 80.0},
            "Confidence": 99.1
        })
    }

    #[test]
    fn test_face_search_last_match_wins() {
        let blob = json!({
            "Persons": [{
                "Timestamp": 100,
                "Person": {"Index": 3, "BoundingBox": {"Top": 0.2}, "Face": person_face()},
                "FaceMatches": [
                    {"Similarity": 90.0, "Face": {"FaceId": "f-1", "BoundingBox": {}, "ImageId": "i-1"}},
                    {"Similarity": 95.0, "Face": {"FaceId": "f-2", "BoundingBox": {"Top": 0.5}, "ImageId": "i-2"}}
                ]
            }]
        });

        let docs = flatten_search(&ctx(), "face_search", &blob.to_string()).unwrap();

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc["PersonIndex"], 3);
        assert_eq!(doc["PersonBoundingBox"], json!({"Top": 0.2}));
        assert_eq!(doc["FaceBoundingBox"], json!({"Left": 0.1}));
        assert_eq!(doc["FaceQuality"], json!({"Sharpness": 80.0}));
        assert_eq!(doc["Confidence"], 99.1);
        assert_eq!(doc["ContainsKnownFace"], true);
        assert_eq!(doc["KnownFaceSimilarity"], 95.0);
        assert_eq!(doc["MatchingKnownFaceId"], "f-2");
        assert_eq!(doc["ImageId"], "i-2");
        assert!(!doc.contains_key("Person"));
        assert!(!doc.contains_key("FaceMatches"));
        assert_eq!(doc["Operator"], "face_search");
    }

    #[test]
    fn test_face_search_without_matches() {
        let blob = json!([
            {"Persons": [{"Timestamp": 1, "Person": {"Index": 0}}]},
            {"Persons": [{"Timestamp": 2, "Person": {"Index": 1}, "FaceMatches": []}]}
        ]);

        let docs = flatten_search(&ctx(), "face_search", &blob.to_string()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["ContainsKnownFace"], false);
        assert!(!docs[0].contains_key("PersonBoundingBox"));
        assert!(!docs[0].contains_key("FaceBoundingBox"));
        assert_eq!(docs[1]["ContainsKnownFace"], true);
        assert!(!docs[1].contains_key("KnownFaceSimilarity"));
    }

    #[test]
    fn test_face_search_drops_person_without_index() {
        let blob = json!({
            "Persons": [
                {"Person": {"BoundingBox": {}}},
                {"Person": {"Index": 7}}
            ]
        });

        let docs = flatten_search(&ctx(), "face_search", &blob.to_string()).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["PersonIndex"], 7);
    }

    #[test]
    fn test_face_detection_video_and_image() {
        let mut face = serde_json::Map::new();
        for attribute in FACE_ATTRIBUTES {
            face.insert(attribute.to_string(), json!(attribute.to_lowercase()));
        }
        let blob = json!({
            "Faces": [{"Timestamp": 500, "Face": face}],
            "FaceDetails": [{"AgeRange": {"Low": 20, "High": 30}}]
        });

        let docs = flatten_detection(&ctx(), "face_detection", &blob.to_string()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["Timestamp"], 500);
        assert_eq!(docs[0]["Smile"], "smile");
        assert_eq!(docs[0]["Confidence"], "confidence");
        assert!(!docs[0].contains_key("Face"));
        assert_eq!(docs[1]["AgeRange"], json!({"Low": 20, "High": 30}));
        assert!(docs.iter().all(|d| d["Operator"] == "face_detection"));
    }

    #[test]
    fn test_face_detection_incomplete_face_is_dropped() {
        let blob = json!({"Faces": [{"Timestamp": 1, "Face": {"BoundingBox": {}}}]});

        let docs = flatten_detection(&ctx(), "face_detection", &blob.to_string()).unwrap();

        assert!(docs.is_empty());
    }
}
