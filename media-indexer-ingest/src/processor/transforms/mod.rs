//! Flattening transforms.
//!
//! Every supported operator produces a differently shaped, nested result.
//! The transforms in this module reshape those results into flat documents,
//! one per detected item (face, label, word, segment ...), or a single
//! document for whole-result operators such as translation.
//!
//! Transforms never fail because of a single malformed item: the item is
//! logged and dropped while its siblings are kept. Only a blob that cannot
//! be parsed, or that lacks the structure a whole-result transform needs,
//! fails the transform as a whole.

mod celebrity;
mod comprehend;
mod documents;
mod faces;
mod labels;
mod mediainfo;
mod moderation;
mod segments;
mod text;
mod transcribe;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::FlattenError;
use crate::processor::operator::Operator;
use media_indexer_shared::{fields, Document, DocumentType};

pub use documents::initialization_document;

/// What the indexer should do with flattened output.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexWrite {
    /// Write many documents through the size-bounded bulk path.
    Bulk {
        document_type: DocumentType,
        documents: Vec<Document>,
    },
    /// Write one document with a single index request.
    Single {
        document_type: DocumentType,
        document: Document,
    },
}

/// Identity of the event a blob belongs to.
#[derive(Debug, Clone, Copy)]
pub struct FlattenContext<'a> {
    /// Asset the results describe.
    pub asset_id: &'a str,
    /// Workflow execution that produced the results.
    pub workflow: &'a str,
}

impl<'a> FlattenContext<'a> {
    /// Create a new context.
    pub fn new(asset_id: &'a str, workflow: &'a str) -> Self {
        Self { asset_id, workflow }
    }

    /// Attach the operator tag and workflow to `document`.
    fn tag(&self, document: &mut Document, operator: &str) {
        document.insert(fields::OPERATOR.to_string(), Value::from(operator));
        document.insert(fields::WORKFLOW.to_string(), Value::from(self.workflow));
    }
}

/// Turns one operator result blob into index writes.
pub trait Flatten {
    /// Flatten `blob`, the raw JSON text fetched for the event in `ctx`.
    fn flatten(&self, ctx: &FlattenContext<'_>, blob: &str) -> Result<Vec<IndexWrite>, FlattenError>;
}

impl Flatten for Operator {
    fn flatten(&self, ctx: &FlattenContext<'_>, blob: &str) -> Result<Vec<IndexWrite>, FlattenError> {
        let Some(document_type) = self.document_type() else {
            return Ok(Vec::new());
        };
        let tag = self.tag();

        let writes = match self {
            Operator::TextDetection => bulk(document_type, text::flatten(ctx, &tag, blob)?),
            Operator::CelebrityRecognition => {
                bulk(document_type, celebrity::flatten(ctx, &tag, blob)?)
            }
            Operator::ContentModeration => {
                bulk(document_type, moderation::flatten(ctx, &tag, blob)?)
            }
            Operator::FaceSearch => bulk(document_type, faces::flatten_search(ctx, &tag, blob)?),
            Operator::FaceDetection => {
                bulk(document_type, faces::flatten_detection(ctx, &tag, blob)?)
            }
            Operator::MediaInfo => bulk(document_type, mediainfo::flatten(ctx, &tag, blob)?),
            Operator::GenericDataLookup => {
                bulk(document_type, labels::flatten_generic(ctx, &tag, blob)?)
            }
            Operator::LabelDetection => {
                bulk(document_type, labels::flatten_detection(ctx, &tag, blob)?)
            }
            Operator::TechnicalCueDetection => bulk(
                document_type,
                segments::flatten(ctx, &tag, blob, segments::SegmentKind::TechnicalCue)?,
            ),
            Operator::ShotDetection => bulk(
                document_type,
                segments::flatten(ctx, &tag, blob, segments::SegmentKind::Shot)?,
            ),
            Operator::Translate => vec![IndexWrite::Single {
                document_type,
                document: documents::flatten_translation(ctx, &tag, blob)?,
            }],
            Operator::WebCaptions { .. } => vec![IndexWrite::Single {
                document_type,
                document: documents::flatten_webcaptions(ctx, &tag, blob)?,
            }],
            Operator::Transcribe { .. } => {
                let (transcript, items) = transcribe::flatten(ctx, &tag, blob)?;
                vec![
                    IndexWrite::Single {
                        document_type: document_type.clone(),
                        document: transcript,
                    },
                    IndexWrite::Bulk {
                        document_type,
                        documents: items,
                    },
                ]
            }
            Operator::Entities => bulk(document_type, comprehend::flatten_entities(ctx, &tag, blob)?),
            Operator::KeyPhrases => {
                bulk(document_type, comprehend::flatten_key_phrases(ctx, &tag, blob)?)
            }
            Operator::Unsupported { .. } => Vec::new(),
        };

        Ok(writes)
    }
}

fn bulk(document_type: DocumentType, documents: Vec<Document>) -> Vec<IndexWrite> {
    vec![IndexWrite::Bulk {
        document_type,
        documents,
    }]
}

/// An item that could not be flattened.
#[derive(Debug)]
struct Rejected {
    error: FlattenError,
    item: Value,
}

fn flatten_item<F>(item: Value, flatten: &mut F) -> Result<Document, Rejected>
where
    F: FnMut(&mut Document) -> Result<(), FlattenError>,
{
    let mut document = match item {
        Value::Object(document) => document,
        other => {
            return Err(Rejected {
                error: FlattenError::unexpected_type("item", "an object"),
                item: other,
            })
        }
    };

    match flatten(&mut document) {
        Ok(()) => Ok(document),
        Err(error) => Err(Rejected {
            error,
            item: Value::Object(document),
        }),
    }
}

/// Flatten each item in place, keeping the ones that succeed.
///
/// `flatten` receives the item as a mutable document; a failed item is
/// logged together with its (possibly partially rewritten) content.
fn flatten_items<I, F>(ctx: &FlattenContext<'_>, operator: &str, items: I, mut flatten: F) -> Vec<Document>
where
    I: IntoIterator<Item = Value>,
    F: FnMut(&mut Document) -> Result<(), FlattenError>,
{
    let mut documents = Vec::new();
    let mut rejected = 0usize;

    for item in items {
        match flatten_item(item, &mut flatten) {
            Ok(document) => documents.push(document),
            Err(Rejected { error, item }) => {
                rejected += 1;
                warn!(
                    asset_id = %ctx.asset_id,
                    operator = %operator,
                    error = %error,
                    item = %item,
                    "Skipping item that could not be flattened"
                );
            }
        }
    }

    debug!(
        operator = %operator,
        flattened = documents.len(),
        rejected = rejected,
        "Flattened operator items"
    );
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> FlattenContext<'static> {
        FlattenContext::new("asset-1", "workflow-1")
    }

    fn face() -> Value {
        json!({
            "BoundingBox": {}, "AgeRange": {}, "Smile": {}, "Eyeglasses": {},
            "Sunglasses": {}, "Gender": {}, "Beard": {}, "Mustache": {},
            "EyesOpen": {}, "MouthOpen": {}, "Emotions": [], "Confidence": 99.0
        })
    }

    fn transcription() -> Value {
        json!({
            "results": {
                "transcripts": [{"transcript": "Hi"}],
                "items": [{"start_time": "0.1", "end_time": "0.2", "alternatives": [{"confidence": "0.9", "content": "Hi"}]}]
            }
        })
    }

    fn written(writes: &[IndexWrite]) -> Vec<(&DocumentType, &Document)> {
        writes
            .iter()
            .flat_map(|write| match write {
                IndexWrite::Bulk {
                    document_type,
                    documents,
                } => documents.iter().map(|d| (document_type, d)).collect::<Vec<_>>(),
                IndexWrite::Single {
                    document_type,
                    document,
                } => vec![(document_type, document)],
            })
            .collect()
    }

    struct Case {
        raw: &'static str,
        blob: Value,
        document_type: &'static str,
        tag: &'static str,
        hoisted: &'static [&'static str],
    }

    #[test]
    fn test_every_supported_operator_dispatches_to_its_transform() {
        let comprehend = |inner: Value| json!({"Results": [inner.to_string()]});
        let cases = vec![
            Case {
                raw: "TextDetection",
                blob: json!({"TextDetections": [{"DetectedText": "x", "Type": "LINE"}]}),
                document_type: "textDetection",
                tag: "textDetection",
                hoisted: &["DetectedText"],
            },
            Case {
                raw: "CelebrityRecognition",
                blob: json!({"Celebrities": [{"Celebrity": {"Name": "A", "Confidence": 90}}]}),
                document_type: "celebrity_detection",
                tag: "celebrity_detection",
                hoisted: &["Name", "URL"],
            },
            Case {
                raw: "ContentModeration",
                blob: json!({"ModerationLabels": [{"ModerationLabel": {"Name": "Violence"}}]}),
                document_type: "content_moderation",
                tag: "content_moderation",
                hoisted: &["Name", "ParentName"],
            },
            Case {
                raw: "face_search",
                blob: json!({"Persons": [{"Person": {"Index": 0}}]}),
                document_type: "face_search",
                tag: "face_search",
                hoisted: &["PersonIndex", "ContainsKnownFace"],
            },
            Case {
                raw: "FaceDetection",
                blob: json!({"Faces": [{"Timestamp": 1, "Face": face()}]}),
                document_type: "face_detection",
                tag: "face_detection",
                hoisted: &["Smile", "Emotions"],
            },
            Case {
                raw: "Mediainfo",
                blob: json!({"tracks": [{"track_type": "General"}]}),
                document_type: "mediainfo",
                tag: "mediainfo",
                hoisted: &["track_type"],
            },
            Case {
                raw: "GenericDataLookup",
                blob: json!({"Labels": [{"Label": {"Name": "Dog", "Confidence": 0.5}}]}),
                document_type: "labels",
                tag: "generic_data_lookup",
                hoisted: &["Name", "Instances"],
            },
            Case {
                raw: "LabelDetection",
                blob: json!({"Labels": [{"Label": {"Name": "Car", "Confidence": 97.5}}]}),
                document_type: "labels",
                tag: "label_detection",
                hoisted: &["Name", "Parents"],
            },
            Case {
                raw: "TechnicalCueDetection",
                blob: json!({"Segments": [{"StartTimestampMillis": 0, "EndTimestampMillis": 10, "TechnicalCueSegment": {"Type": "BlackFrames", "Confidence": 90.0}}]}),
                document_type: "technical_cues",
                tag: "technical_cue_detection",
                hoisted: &["Type", "StartTimestamp", "EndTimestamp"],
            },
            Case {
                raw: "ShotDetection",
                blob: json!({"Segments": [{"StartTimestampMillis": 0, "EndTimestampMillis": 10, "ShotSegment": {"Index": 0, "Confidence": 90.0}}]}),
                document_type: "shots",
                tag: "shot_detection",
                hoisted: &["Index", "StartTimestamp", "EndTimestamp"],
            },
            Case {
                raw: "Translate",
                blob: json!({"TranslatedText": "hola"}),
                document_type: "translation",
                tag: "translation",
                hoisted: &["workflow"],
            },
            Case {
                raw: "WebCaptions_en",
                blob: json!({"WebCaptions": []}),
                document_type: "webcaptions_en",
                tag: "webcaptions_en",
                hoisted: &["Workflow"],
            },
            Case {
                raw: "TranscribeVideo",
                blob: transcription(),
                document_type: "videotranscript",
                tag: "transcribe",
                hoisted: &[],
            },
            Case {
                raw: "TranscribeAudio",
                blob: transcription(),
                document_type: "audiotranscript",
                tag: "transcribe",
                hoisted: &[],
            },
            Case {
                raw: "Entities",
                blob: comprehend(json!({"Entities": [{"Type": "PERSON", "Text": "Ana", "Score": 0.5}]})),
                document_type: "entities",
                tag: "entities",
                hoisted: &["EntityType", "EntityText", "Confidence"],
            },
            Case {
                raw: "Key_Phrases",
                blob: comprehend(json!({"KeyPhrases": [{"Text": "the river", "Score": 0.5}]})),
                document_type: "key_phrases",
                tag: "key_phrases",
                hoisted: &["PhraseText", "Confidence"],
            },
        ];

        for Case {
            raw,
            blob,
            document_type,
            tag,
            hoisted,
        } in cases
        {
            let writes = Operator::parse(raw).flatten(&ctx(), &blob.to_string()).unwrap();
            let documents = written(&writes);

            assert!(!documents.is_empty(), "{} produced no documents", raw);
            for (written_type, document) in documents {
                assert_eq!(written_type.to_string(), document_type, "document type of {}", raw);
                assert_eq!(document[fields::OPERATOR], tag, "operator tag of {}", raw);
                for field in hoisted {
                    assert!(document.contains_key(*field), "{} lacks {}", raw, field);
                }
            }
        }
    }

    #[test]
    fn test_transcription_writes_transcript_then_items() {
        let writes = Operator::parse("TranscribeVideo")
            .flatten(&ctx(), &transcription().to_string())
            .unwrap();

        assert_eq!(writes.len(), 2);
        assert!(matches!(&writes[0], IndexWrite::Single { document, .. } if document["transcript"] == "Hi"));
        assert!(matches!(&writes[1], IndexWrite::Bulk { documents, .. } if documents.len() == 1));
    }

    #[test]
    fn test_generic_data_lookup_full_frame_box() {
        let blob = json!({
            "Labels": [{
                "Label": {
                    "Name": "Screen",
                    "Confidence": 0.5,
                    "Instances": [{
                        "Confidence": 0.5,
                        "BoundingBox": {"Height": 720, "Top": 0, "Left": 0, "Width": 1280}
                    }]
                }
            }]
        });

        let writes = Operator::parse("GenericDataLookup")
            .flatten(&ctx(), &blob.to_string())
            .unwrap();
        let documents = written(&writes);

        assert_eq!(documents.len(), 1);
        let (_, document) = documents[0];
        assert_eq!(document["Confidence"], "50.0");
        let bounding_box = &document["Instances"][0]["BoundingBox"];
        assert_eq!(bounding_box["Height"], 1.0);
        assert_eq!(bounding_box["Top"], 0.0);
        assert_eq!(bounding_box["Left"], 0.0);
        assert_eq!(bounding_box["Width"], 1.0);
    }

    #[test]
    fn test_face_detection_across_pages() {
        let blob = json!([
            {"Faces": [{"Timestamp": 1, "Face": face()}]},
            {"FaceDetails": [{"AgeRange": {"Low": 20, "High": 30}}]}
        ]);

        let writes = Operator::parse("FaceDetection")
            .flatten(&ctx(), &blob.to_string())
            .unwrap();
        let documents = written(&writes);

        assert_eq!(documents.len(), 2);
        assert!(documents[0].1.contains_key("Smile"));
        assert!(!documents[0].1.contains_key("Face"));
        assert_eq!(documents[1].1["AgeRange"], json!({"Low": 20, "High": 30}));
        assert!(documents
            .iter()
            .all(|(_, d)| d[fields::OPERATOR] == "face_detection"));
    }

    #[test]
    fn test_unsupported_operator_writes_nothing() {
        let writes = Operator::parse("Thumbnail").flatten(&ctx(), "{}").unwrap();
        assert!(writes.is_empty());
    }
}
